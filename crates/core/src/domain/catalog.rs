//! Fixed word lists the fortune prompt and lucky draws pick from.

pub const THEMES: [&str; 12] = [
    "cosmic alignment",
    "ancient prophecy",
    "crystal ball vision",
    "tarot cards",
    "tea leaves",
    "dragon's breath",
    "unicorn whispers",
    "mystical runes",
    "enchanted forest spirits",
    "celestial bodies",
    "magical potions",
    "wizard's scroll",
];

pub const STYLES: [&str; 6] = [
    "mysterious and cryptic",
    "overly dramatic and theatrical",
    "comically specific and oddly detailed",
    "zen-like with nonsensical wisdom",
    "rhyming like a bad poem",
    "like a confused fortune cookie mixed with horoscope",
];

pub const LUCKY_COLORS: [&str; 6] = [
    "Mystical Purple",
    "Cosmic Blue",
    "Enchanted Green",
    "Dragon Red",
    "Unicorn Pink",
    "Phoenix Gold",
];

pub const LUCKY_NUMBER_COUNT: usize = 6;
pub const LUCKY_NUMBER_MAX: u32 = 99;
