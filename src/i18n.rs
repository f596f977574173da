//! Text catalog
//!
//! German is the home language of the game; English is the alternative.
//! Lookups fall back to the key itself so a missing entry shows up on screen
//! instead of breaking the page.

use serde::{Deserialize, Serialize};

/// Display language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    De,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::De, Language::En];

    /// BCP 47 code used for `<html lang>` and the language picker
    pub fn code(&self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "de" | "de-de" | "deutsch" => Some(Language::De),
            "en" | "en-us" | "en-gb" | "english" => Some(Language::En),
            _ => None,
        }
    }

    /// Like `from_code`, unknown codes fall back to German
    pub fn from_code_or_default(code: &str) -> Self {
        Self::from_code(code).unwrap_or_default()
    }

    fn table(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Language::De => DE,
            Language::En => EN,
        }
    }

    /// Catalog entry, if there is one
    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        self.table()
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, text)| *text)
    }

    /// Catalog entry or the key itself
    pub fn text(&self, key: &str) -> String {
        self.lookup(key).unwrap_or(key).to_string()
    }

    /// Owned lookup closure for `RoundMachine::refresh_language`
    pub fn text_lookup(self) -> impl Fn(&str) -> String + 'static {
        move |key| self.text(key)
    }
}

const DE: &[(&str, &str)] = &[
    ("pageTitle", "Tier Ding Name"),
    ("languageLabel", "Sprache"),
    ("languageSelectAria", "Sprache waehlen"),
    ("heroTag", "Das wilde Wortspiel fuer Kinder"),
    (
        "heroText",
        "Dreht am Gluecksrad, ruft laut den Buchstaben und findet blitzschnell ein Tier, ein Ding und einen Namen!",
    ),
    ("minutesLabel", "Rundenzeit (Minuten)"),
    ("newRoundButton", "Neue Runde starten"),
    ("startLetterTitle", "Startbuchstabe"),
    ("timeRemainingTitle", "Verbleibende Zeit"),
    ("endRoundBanner", "Runde vorbei!"),
    ("messageReady", "Waehle eine Zeit und starte eine Runde."),
    ("howtoTitle", "So macht das Spiel am meisten Spass"),
    ("howtoOneTitle", "1. Rad drehen"),
    (
        "howtoOneText",
        "Startet die Runde und schaut, wo der Zeiger stoppt. Der Buchstabe gilt fuer alle.",
    ),
    ("howtoTwoTitle", "2. Schnell denken"),
    (
        "howtoTwoText",
        "Sammelt kreative Ideen. Je ausgefallener und passender, desto besser.",
    ),
    ("howtoThreeTitle", "3. Gemeinsam feiern"),
    (
        "howtoThreeText",
        "Wenn die Zeit um ist, vergleicht ihr eure Begriffe. 2 Punkte fuer ein einzigartiges Wort, 1 Punkt bei gleicher Antwort, 0 Punkte ohne Antwort.",
    ),
    ("howtoFourTitle", "4. Gewinner ist"),
    ("howtoFourText", "Wer nach mehreren Runden die meisten Punkte hat."),
    ("messageRoundEnded", "Runde beendet."),
    ("messageDrawCanceled", "Auslosung abgebrochen."),
    ("messageTimeUp", "Zeit ist um. Runde vorbei!"),
    ("messageRoundRunning", "Runde laeuft. Findet Tier, Ding und Name!"),
    ("messageSpinning", "Gluecksrad dreht..."),
    (
        "messageValidation",
        "Bitte gib eine Zahl zwischen 1 und 30 Minuten ein.",
    ),
];

const EN: &[(&str, &str)] = &[
    ("pageTitle", "Animal Thing Name"),
    ("languageLabel", "Language"),
    ("languageSelectAria", "Choose language"),
    ("heroTag", "The wild word game for kids"),
    (
        "heroText",
        "Spin the wheel, call out the letter, and quickly find an animal, an object, and a name!",
    ),
    ("minutesLabel", "Round time (minutes)"),
    ("newRoundButton", "Start new round"),
    ("startLetterTitle", "Starting letter"),
    ("timeRemainingTitle", "Time left"),
    ("endRoundBanner", "Round over!"),
    ("messageReady", "Choose a time and start a round."),
    ("howtoTitle", "How to make the game extra fun"),
    ("howtoOneTitle", "1. Spin the wheel"),
    (
        "howtoOneText",
        "Start the round and watch where the pointer stops. That letter is for everyone.",
    ),
    ("howtoTwoTitle", "2. Think fast"),
    (
        "howtoTwoText",
        "Collect creative ideas. The more unique and fitting, the better.",
    ),
    ("howtoThreeTitle", "3. Celebrate together"),
    (
        "howtoThreeText",
        "When time is up, compare answers. 2 points for a unique word, 1 point for a shared word, 0 if empty.",
    ),
    ("howtoFourTitle", "4. Winner is"),
    ("howtoFourText", "Whoever has the most points after several rounds."),
    ("messageRoundEnded", "Round ended."),
    ("messageDrawCanceled", "Draw canceled."),
    ("messageTimeUp", "Time is up. Round over!"),
    (
        "messageRoundRunning",
        "Round is running. Find animal, thing, and name!",
    ),
    ("messageSpinning", "Wheel is spinning..."),
    (
        "messageValidation",
        "Please enter a number between 1 and 30 minutes.",
    ),
];
