//! Built-in catalog: the ambient loops shipped with the app and the
//! 114-track recitation list.

use super::{AmbientTrack, Catalog, RecitationTrack, Reciter};

const AMBIENT: [(&str, &str, &str); 8] = [
    ("birds", "Birds", "https://upbase.io/_assets/pomoup/1_Birds.mp3"),
    ("rain", "Rain", "https://upbase.io/_assets/pomoup/2_Rain.mp3"),
    ("thunder", "Thunder", "https://upbase.io/_assets/pomoup/3_Thunder.mp3"),
    ("waterfall", "Waterfall", "audios/waterfall.mp3"),
    ("waves", "Waves", "https://upbase.io/_assets/pomoup/8_Ocean_Waves.mp3"),
    ("cafe", "Cafe", "https://upbase.io/_assets/pomoup/4_Coffee_Shop.mp3"),
    ("fire", "Fire", "https://upbase.io/_assets/pomoup/6_Fire.mp3"),
    ("night", "Night", "audios/night.mp3"),
];

const RECITERS: [(&str, &str, &str); 7] = [
    ("qtm", "Nasser Al Qatami", "https://server6.mp3quran.net/qtm"),
    ("afs", "Mishary Alafasy", "https://server8.mp3quran.net/afs"),
    ("s_gmd", "Saad Al Ghamdi", "https://server7.mp3quran.net/s_gmd"),
    ("sds", "Abdulrahman Alsudaes", "https://server11.mp3quran.net/sds"),
    ("maher", "Maher Al Meaqli", "https://server12.mp3quran.net/maher"),
    ("husr", "Mahmoud Khalil Al-Hussary", "https://server13.mp3quran.net/husr"),
    ("basit", "Abdulbasit Abdulsamad", "https://server7.mp3quran.net/basit"),
];

const RECITATION_TRACKS: [&str; 114] = [
    "Al-Fatihah",
    "Al-Baqarah",
    "Ali 'Imran",
    "An-Nisa",
    "Al-Ma'idah",
    "Al-An'am",
    "Al-A'raf",
    "Al-Anfal",
    "At-Tawbah",
    "Yunus",
    "Hud",
    "Yusuf",
    "Ar-Ra'd",
    "Ibrahim",
    "Al-Hijr",
    "An-Nahl",
    "Al-Isra",
    "Al-Kahf",
    "Maryam",
    "Taha",
    "Al-Anbya",
    "Al-Hajj",
    "Al-Mu'minun",
    "An-Nur",
    "Al-Furqan",
    "Ash-Shu'ara",
    "An-Naml",
    "Al-Qasas",
    "Al-'Ankabut",
    "Ar-Rum",
    "Luqman",
    "As-Sajdah",
    "Al-Ahzab",
    "Saba",
    "Fatir",
    "Yasin",
    "As-Saffat",
    "Sad",
    "Az-Zumar",
    "Ghafir",
    "Fussilat",
    "Ash-Shuraa",
    "Az-Zukhruf",
    "Ad-Dukhan",
    "Al-Jathiyah",
    "Al-Ahqaf",
    "Muhammad",
    "Al-Fath",
    "Al-Hujurat",
    "Qaf",
    "Adh-Dhariyat",
    "At-Tur",
    "An-Najm",
    "Al-Qamar",
    "Ar-Rahman",
    "Al-Waqi'ah",
    "Al-Hadid",
    "Al-Mujadila",
    "Al-Hashr",
    "Al-Mumtahanah",
    "As-Saf",
    "Al-Jumu'ah",
    "Al-Munafiqun",
    "At-Taghabun",
    "At-Talaq",
    "At-Tahrim",
    "Al-Mulk",
    "Al-Qalam",
    "Al-Haqqah",
    "Al-Ma'arij",
    "Nuh",
    "Al-Jinn",
    "Al-Muzzammil",
    "Al-Muddaththir",
    "Al-Qiyamah",
    "Al-Insan",
    "Al-Mursalat",
    "An-Naba",
    "An-Nazi'at",
    "'Abasa",
    "At-Takwir",
    "Al-Infitar",
    "Al-Mutaffifin",
    "Al-Inshiqaq",
    "Al-Buruj",
    "At-Tariq",
    "Al-A'la",
    "Al-Ghashiyah",
    "Al-Fajr",
    "Al-Balad",
    "Ash-Shams",
    "Al-Layl",
    "Ad-Duhaa",
    "Ash-Sharh",
    "At-Tin",
    "Al-'Alaq",
    "Al-Qadr",
    "Al-Bayyinah",
    "Az-Zalzalah",
    "Al-'Adiyat",
    "Al-Qari'ah",
    "At-Takathur",
    "Al-'Asr",
    "Al-Humazah",
    "Al-Fil",
    "Quraysh",
    "Al-Ma'un",
    "Al-Kawthar",
    "Al-Kafirun",
    "An-Nasr",
    "Al-Masad",
    "Al-Ikhlas",
    "Al-Falaq",
    "An-Nas",
];

pub(super) fn catalog() -> Catalog {
    Catalog {
        ambient: AMBIENT
            .iter()
            .map(|(id, name, source)| AmbientTrack {
                id: (*id).into(),
                display_name: (*name).into(),
                source: (*source).into(),
            })
            .collect(),
        reciters: RECITERS
            .iter()
            .map(|(id, name, base)| Reciter {
                id: (*id).into(),
                display_name: (*name).into(),
                source_base: (*base).into(),
            })
            .collect(),
        recitation_tracks: RECITATION_TRACKS
            .iter()
            .enumerate()
            .map(|(index, name)| RecitationTrack {
                id: format!("{:03}", index + 1),
                display_name: (*name).into(),
            })
            .collect(),
    }
}
