use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emulator {
    Mame,
    Flycast,
    DuckStation,
    TeknoParrot,
    Pcsx2,
    Dolphin,
}

impl Emulator {
    /// Looks up the emulator owning an executable, by file name
    /// (`pcsx2-qt.exe`), case-insensitively.
    pub fn from_process(process_name: &str) -> Option<Self> {
        let name = process_name.trim().to_ascii_lowercase();
        let emulator = match name.as_str() {
            "mame.exe" => Emulator::Mame,
            "flycast.exe" => Emulator::Flycast,
            "duckstation-qt-x64-releaseltcg.exe" => Emulator::DuckStation,
            "teknoparrotui.exe" => Emulator::TeknoParrot,
            "pcsx2.exe" | "pcsx2-qt.exe" | "pcsx2-qtx64-avx2.exe" => Emulator::Pcsx2,
            "dolphin.exe" | "dolphinqt.exe" | "dolphinqt2.exe" => Emulator::Dolphin,
            _ => return None,
        };
        Some(emulator)
    }

    pub fn name(self) -> &'static str {
        match self {
            Emulator::Mame => "mame",
            Emulator::Flycast => "flycast",
            Emulator::DuckStation => "duckstation",
            Emulator::TeknoParrot => "teknoparrot",
            Emulator::Pcsx2 => "pcsx2",
            Emulator::Dolphin => "dolphin",
        }
    }

    /// Lower-case fragments of dialog and helper window titles that never
    /// name a game.
    pub fn transient_titles(self) -> &'static [&'static str] {
        match self {
            Emulator::DuckStation => &[
                "duckstation-qt-x64-releaseltcg",
                "select disc image",
                "automatic updater",
                "about duckstation",
                "about qt",
                "padtest",
                "memory scanner",
                "download covers",
                "memory card editor",
                "iso browser",
                "select search directory",
                "duckstation settings",
                "error",
                "select save state file",
                "duckstation controller presets",
                "select background image",
            ],
            Emulator::Pcsx2 => &[
                "pcsx2-qt",
                "ps2 bios (usa)",
                "select iso image",
                "open iso",
                "about pcsx2",
                "about qt",
                "automatic updater",
                "select location to save block dump",
                "show advanced settings",
                "select search directory",
                "select save state file",
            ],
            Emulator::Dolphin => &["dolphin-emu", "confirm", "open file"],
            Emulator::Mame | Emulator::Flycast | Emulator::TeknoParrot => &[],
        }
    }

    /// `lower` must already be lower-cased.
    pub fn is_transient(self, lower: &str) -> bool {
        self.transient_titles()
            .iter()
            .any(|needle| lower.contains(needle))
    }
}

impl fmt::Display for Emulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_names_are_case_insensitive() {
        assert_eq!(Emulator::from_process("MAME.EXE"), Some(Emulator::Mame));
        assert_eq!(
            Emulator::from_process("pcsx2-qtx64-avx2.exe"),
            Some(Emulator::Pcsx2)
        );
        assert_eq!(Emulator::from_process("DolphinQt2.exe"), Some(Emulator::Dolphin));
        assert_eq!(Emulator::from_process("explorer.exe"), None);
    }

    #[test]
    fn only_dialog_heavy_emulators_have_transients() {
        assert!(Emulator::DuckStation.is_transient("memory card editor"));
        assert!(Emulator::Pcsx2.is_transient("about qt"));
        assert!(!Emulator::Mame.is_transient("about qt"));
    }
}
