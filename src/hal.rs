//! The two seams between the console core and the machine.

/// Character-cell frame buffer with a hardware cursor.
pub trait Display {
    /// Writes one cell. Coordinates are always inside the grid.
    fn put(&mut self, col: usize, row: usize, byte: u8, attr: u8);

    /// Zeroes every cell.
    fn clear(&mut self);

    fn set_cursor(&mut self, col: usize, row: usize);
}

/// Whole-machine power control.
pub trait Machine {
    fn shutdown(&mut self);
    fn reboot(&mut self);
}
