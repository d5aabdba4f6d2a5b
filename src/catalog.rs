use std::ops::RangeInclusive;

use serde::Serialize;

use crate::error::SummaryError;

#[derive(Debug, Serialize)]
pub struct Book {
    pub name: &'static str,
    pub chapters: u32,
}

#[derive(Debug, Serialize)]
pub struct Canon {
    pub key: &'static str,
    pub name: &'static str,
    pub books: &'static [Book],
}

const fn b(name: &'static str, chapters: u32) -> Book {
    Book { name, chapters }
}

pub static CANONS: &[Canon] = &[
    Canon {
        key: "bom",
        name: "Book of Mormon",
        books: &[
            b("1 Nephi", 22),
            b("2 Nephi", 33),
            b("Jacob", 7),
            b("Enos", 1),
            b("Jarom", 1),
            b("Omni", 1),
            b("Words of Mormon", 1),
            b("Mosiah", 29),
            b("Alma", 63),
            b("Helaman", 16),
            b("3 Nephi", 30),
            b("4 Nephi", 1),
            b("Mormon", 9),
            b("Ether", 15),
            b("Moroni", 10),
        ],
    },
    Canon {
        key: "ot",
        name: "Bible - Old Testament",
        books: &[
            b("Genesis", 50),
            b("Exodus", 40),
            b("Leviticus", 27),
            b("Numbers", 36),
            b("Deuteronomy", 34),
            b("Joshua", 24),
            b("Judges", 21),
            b("Ruth", 4),
            b("1 Samuel", 31),
            b("2 Samuel", 24),
            b("1 Kings", 22),
            b("2 Kings", 25),
            b("1 Chronicles", 29),
            b("2 Chronicles", 36),
            b("Ezra", 10),
            b("Nehemiah", 13),
            b("Esther", 10),
            b("Job", 42),
            b("Psalms", 150),
            b("Proverbs", 31),
            b("Ecclesiastes", 12),
            b("Song of Solomon", 8),
            b("Isaiah", 66),
            b("Jeremiah", 52),
            b("Lamentations", 5),
            b("Ezekiel", 48),
            b("Daniel", 12),
            b("Hosea", 14),
            b("Joel", 3),
            b("Amos", 9),
            b("Obadiah", 1),
            b("Jonah", 4),
            b("Micah", 7),
            b("Nahum", 3),
            b("Habakkuk", 3),
            b("Zephaniah", 3),
            b("Haggai", 2),
            b("Zechariah", 14),
            b("Malachi", 4),
        ],
    },
    Canon {
        key: "nt",
        name: "Bible - New Testament",
        books: &[
            b("Matthew", 28),
            b("Mark", 16),
            b("Luke", 24),
            b("John", 21),
            b("Acts", 28),
            b("Romans", 16),
            b("1 Corinthians", 16),
            b("2 Corinthians", 13),
            b("Galatians", 6),
            b("Ephesians", 6),
            b("Philippians", 4),
            b("Colossians", 4),
            b("1 Thessalonians", 5),
            b("2 Thessalonians", 3),
            b("1 Timothy", 6),
            b("2 Timothy", 4),
            b("Titus", 3),
            b("Philemon", 1),
            b("Hebrews", 13),
            b("James", 5),
            b("1 Peter", 5),
            b("2 Peter", 3),
            b("1 John", 5),
            b("2 John", 1),
            b("3 John", 1),
            b("Jude", 1),
            b("Revelation", 22),
        ],
    },
    Canon {
        key: "dc",
        name: "Doctrine and Covenants",
        books: &[b("Doctrine and Covenants", 138)],
    },
    Canon {
        key: "pgp",
        name: "Pearl of Great Price",
        books: &[
            b("Moses", 8),
            b("Abraham", 5),
            b("Joseph Smith-Matthew", 1),
            b("Joseph Smith-History", 1),
            b("Articles of Faith", 1),
        ],
    },
];

pub const DEFAULT_CANON: &str = "nt";
pub const DEFAULT_BOOK: &str = "John";
pub const DEFAULT_CHAPTER: u32 = 3;

// Unknown keys fall back to the first canon.
pub fn lookup_canon(key: &str) -> &'static Canon {
    find_canon(key).unwrap_or(&CANONS[0])
}

pub fn find_canon(key: &str) -> Result<&'static Canon, SummaryError> {
    CANONS
        .iter()
        .find(|c| c.key == key)
        .ok_or_else(|| SummaryError::NotFound { kind: "canon", name: key.to_string() })
}

pub fn books_of(canon: &Canon) -> Vec<&'static str> {
    canon.books.iter().map(|b| b.name).collect()
}

pub fn chapter_count(canon: &Canon, book: &str) -> Result<u32, SummaryError> {
    canon
        .books
        .iter()
        .find(|b| b.name == book)
        .map(|b| b.chapters)
        .ok_or_else(|| SummaryError::NotFound { kind: "book", name: book.to_string() })
}

pub fn chapter_range(canon: &Canon, book: &str) -> Result<RangeInclusive<u32>, SummaryError> {
    chapter_count(canon, book).map(|n| 1..=n)
}

pub fn chapter_reference(canon: &Canon, book: &str, chapter: u32) -> Result<String, SummaryError> {
    let range = chapter_range(canon, book)?;
    if !range.contains(&chapter) {
        return Err(SummaryError::ChapterOutOfRange {
            book: book.to_string(),
            chapter,
            max: *range.end(),
        });
    }
    Ok(format!("{book} {chapter}"))
}
