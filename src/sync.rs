/// Runs `f` with maskable interrupts disabled, restoring the previous
/// interrupt flag afterwards.
///
/// Every lock shared with the keyboard interrupt is taken inside this,
/// so the handler never spins on a lock the foreground already holds.
#[cfg(not(test))]
#[inline]
pub fn critical<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    x86_64::instructions::interrupts::without_interrupts(f)
}

// Host tests run in user mode, where `cli` faults.
#[cfg(test)]
#[inline]
pub fn critical<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    f()
}
