//! Built-in programs, registered once at boot.

use crate::buffer::LineBuffer;
use crate::constants::share::BLOCK_MAX;
use crate::error::Error;
use crate::search::{SearchMode, ShiftTable};
use crate::share::{ShareArena, ShareBlock};
use crate::shell::{Args, Context, ProgramFn, Registry};
use crate::{log_info, out, outln};

const LOG_ORIGIN: &str = "programs";

/// Share name the search template is stored under.
pub const TEMPLATE_KEY: &str = "temp";

type Template = LineBuffer<BLOCK_MAX>;

/// Command dispatch table - add new programs here
const BUILTINS: &[(&str, &str, ProgramFn)] = &[
    ("help", "List available programs", help),
    ("info", "Show system information", info),
    ("upcase", "Print words in upper case", upcase),
    ("downcase", "Print words in lower case", downcase),
    ("titlize", "Capitalize the first letter of each word", titlize),
    ("template", "Store the search template", template),
    ("search", "Search a string for the stored template", search),
    ("mode", "Show or set the search mode (std|bm)", mode),
    ("clear", "Clear the screen", clear),
    ("reboot", "Reboot the system", reboot),
    ("shutdown", "Power off the machine", shutdown),
];

pub fn install(registry: &mut Registry) -> Result<(), Error> {
    for &(name, text, main) in BUILTINS {
        registry.register(name, text, main)?;
    }
    log_info!(LOG_ORIGIN, "{} programs installed", registry.len());
    Ok(())
}

fn help(ctx: &mut Context<'_>, _args: &Args<'_>) -> i32 {
    let programs = ctx.programs;
    outln!(ctx, "Available commands:");
    for (i, program) in programs.iter().enumerate() {
        outln!(ctx, "{}: {:<10} {}", i, program.name, program.help);
    }
    0
}

fn info(ctx: &mut Context<'_>, _args: &Args<'_>) -> i32 {
    let (programs, blocks, mode) = (ctx.programs.len(), ctx.share.len(), ctx.config.search_mode);
    outln!(ctx, "TextOS interactive console");
    outln!(ctx, "Programs: {}", programs);
    outln!(ctx, "Shared blocks: {}", blocks);
    outln!(ctx, "Mode: {}", mode);
    0
}

fn usage_words(ctx: &mut Context<'_>, args: &Args<'_>) -> i32 {
    outln!(ctx, "Usage: {} <word> [word] [word]", args.name());
    1
}

/// Prints each operand through `map(position, byte)`, one space after
/// every word, then a newline.
fn print_words(ctx: &mut Context<'_>, args: &Args<'_>, map: fn(usize, u8) -> u8) -> i32 {
    if args.operands().is_empty() {
        return usage_words(ctx, args);
    }
    for word in args.operands() {
        let mut mapped: LineBuffer<BLOCK_MAX> = LineBuffer::new();
        for (i, byte) in word.bytes().enumerate() {
            if mapped.push(map(i, byte)).is_err() {
                break;
            }
        }
        out!(ctx, "{} ", mapped.as_str());
    }
    outln!(ctx);
    0
}

fn upcase(ctx: &mut Context<'_>, args: &Args<'_>) -> i32 {
    print_words(ctx, args, |_, c| c.to_ascii_uppercase())
}

fn downcase(ctx: &mut Context<'_>, args: &Args<'_>) -> i32 {
    print_words(ctx, args, |_, c| c.to_ascii_lowercase())
}

fn titlize(ctx: &mut Context<'_>, args: &Args<'_>) -> i32 {
    print_words(ctx, args, |i, c| if i == 0 { c.to_ascii_uppercase() } else { c })
}

/// Stored template: the block's bytes up to the first NUL.
fn read_template(share: &ShareArena, block: ShareBlock) -> Template {
    let mut template = Template::new();
    for &byte in share.bytes(block).iter().take_while(|&&b| b != 0) {
        if template.push(byte).is_err() {
            break;
        }
    }
    template
}

fn template(ctx: &mut Context<'_>, args: &Args<'_>) -> i32 {
    let Some(text) = args.get(1) else {
        outln!(ctx, "Usage: {} <substring>", args.name());
        return 1;
    };

    let block = match ctx.share.lookup(TEMPLATE_KEY) {
        Some(block) => block,
        None => match ctx.share.reserve(TEMPLATE_KEY, BLOCK_MAX) {
            Ok(block) => block,
            Err(_) => {
                outln!(ctx, "Out of memory");
                return 2;
            }
        },
    };

    // keep one NUL so the stored text is always terminated
    let stored = text.len().min(block.size.saturating_sub(1));
    let dst = ctx.share.bytes_mut(block);
    dst.fill(0);
    dst[..stored].copy_from_slice(&text.as_bytes()[..stored]);

    let template = read_template(ctx.share, block);
    out!(ctx, "Template '{}' loaded. ", template.as_str());
    if ctx.config.search_mode == SearchMode::BoyerMoore {
        outln!(ctx, "BM info:");
        let table = ShiftTable::build(template.as_bytes());
        for &c in template.as_bytes() {
            out!(ctx, "{}:{} ", c as char, table.shift(c));
        }
    }
    outln!(ctx);
    0
}

fn search(ctx: &mut Context<'_>, args: &Args<'_>) -> i32 {
    let Some(haystack) = args.get(1) else {
        outln!(ctx, "Usage: {} <string>", args.name());
        return 1;
    };

    let Some(block) = ctx.share.lookup(TEMPLATE_KEY) else {
        outln!(ctx, "No template loaded. Use <template> command to add template.");
        return 2;
    };
    let template = read_template(ctx.share, block);

    match ctx.config.search_mode.find(haystack.as_bytes(), template.as_bytes()) {
        Some(offset) => outln!(ctx, "Found '{}' at pos: {}", template.as_str(), offset),
        None => outln!(ctx, "Not found '{}'", template.as_str()),
    }
    0
}

fn mode(ctx: &mut Context<'_>, args: &Args<'_>) -> i32 {
    let Some(name) = args.get(1) else {
        let current = ctx.config.search_mode;
        outln!(ctx, "Mode: {}", current);
        return 0;
    };
    match SearchMode::parse(name) {
        Some(mode) => {
            ctx.config.search_mode = mode;
            log_info!(LOG_ORIGIN, "search mode set to {}", mode);
            outln!(ctx, "Mode: {}", mode);
            0
        }
        None => {
            outln!(ctx, "Usage: {} [std|bm]", args.name());
            1
        }
    }
}

fn clear(ctx: &mut Context<'_>, _args: &Args<'_>) -> i32 {
    ctx.console.clear();
    0
}

fn reboot(ctx: &mut Context<'_>, _args: &Args<'_>) -> i32 {
    outln!(ctx, "Rebooting system...");
    ctx.machine.reboot();
    0
}

fn shutdown(ctx: &mut Context<'_>, _args: &Args<'_>) -> i32 {
    outln!(ctx, "Shutting down...");
    ctx.machine.shutdown();
    0
}
