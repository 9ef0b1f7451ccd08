use crate::emulator::Emulator;

/// Result of reading a window title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedTitle {
    /// Name to show on the marquee, a game or an `*-MENU` token.
    Rom(String),
    /// A dialog or helper window of the emulator.
    Transient,
    /// Nothing usable in the title.
    Empty,
}

const MAME_EMPTY_SLOT: &str = "___empty";

pub fn parse_title(emulator: Emulator, title: &str) -> ParsedTitle {
    let trimmed = title.trim();
    let lower = trimmed.to_lowercase();

    if emulator.is_transient(&lower) {
        return ParsedTitle::Transient;
    }

    let rom = match emulator {
        Emulator::Mame => mame_rom(title),
        Emulator::Flycast if lower.starts_with("flycast") => Some(
            title
                .find("- ")
                .map(|dash| title[dash + 2..].trim().to_string())
                .unwrap_or_else(|| "DCEMU-MENU".to_string()),
        ),
        Emulator::DuckStation => Some(menu_or(&lower, "duckstation", "PS1EMU-MENU", trimmed)),
        Emulator::TeknoParrot => Some(menu_or(&lower, "teknoparrot", "TPEMU-MENU", trimmed)),
        Emulator::Pcsx2 => Some(menu_or(&lower, "pcsx2", "PS2EMU-MENU", trimmed)),
        Emulator::Dolphin => Some(menu_or(&lower, "dolphin", "DOLPHIN-MENU", trimmed)),
        Emulator::Flycast => Some(trimmed.to_string()),
    };

    match rom {
        Some(rom) if !rom.is_empty() => ParsedTitle::Rom(rom),
        _ => ParsedTitle::Empty,
    }
}

/// MAME puts the rom name in brackets: `MAME: Galaga [galaga]`.
fn mame_rom(title: &str) -> Option<String> {
    let start = title.find('[')?;
    let end = start + title[start..].find(']')?;
    let rom = &title[start + 1..end];
    if rom == MAME_EMPTY_SLOT {
        Some("MAME-MENU".to_string())
    } else {
        Some(rom.to_string())
    }
}

fn menu_or(lower: &str, prefix: &str, menu: &str, trimmed: &str) -> String {
    if lower.starts_with(prefix) {
        menu.to_string()
    } else {
        trimmed.to_string()
    }
}
