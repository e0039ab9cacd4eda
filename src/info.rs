use crate::config::PageFormat;
use crate::refs::{ObjectReferences, RefType};
use chrono::prelude::*;
use pdf_writer::{Date as PDate, Pdf, TextStr};

/// Document info dictionary of an exported Liedblatt
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Info {
    pub title: Option<String>,
    /// The print format, e.g. `a5`
    pub subject: Option<String>,
    pub keywords: Option<String>,
}

impl Info {
    pub fn new() -> Info {
        Info::default()
    }

    /// Metadata for one export of `format`
    pub fn for_export(format: PageFormat, brochure: bool) -> Info {
        let title = if brochure {
            "Liedblatt (Broschüre)"
        } else {
            "Liedblatt"
        };
        let mut keywords = vec!["Liedblatt", format.key()];
        if brochure {
            keywords.push(format.family().key());
        }

        Info {
            title: Some(title.to_string()),
            subject: Some(format.key().to_string()),
            keywords: Some(keywords.join(", ")),
        }
    }

    pub fn title<S: ToString>(&mut self, title: S) -> &mut Self {
        self.title = Some(title.to_string());
        self
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        let mut info = writer.document_info(refs.gen(RefType::Info));

        if let Some(title) = &self.title {
            info.title(TextStr(title));
        }
        if let Some(subject) = &self.subject {
            info.subject(TextStr(subject));
        }
        if let Some(keywords) = &self.keywords {
            info.keywords(TextStr(keywords));
        }
        info.creator(TextStr(concat!(
            env!("CARGO_PKG_NAME"),
            " v",
            env!("CARGO_PKG_VERSION")
        )));
        info.creation_date(pdf_date(Local::now().fixed_offset()));
    }
}

/// Convert a timestamp into a PDF date, keeping its UTC offset
fn pdf_date(time: DateTime<FixedOffset>) -> PDate {
    let offset_minutes = time.offset().local_minus_utc() / 60;
    PDate::new(time.year() as u16)
        .month(time.month() as u8)
        .day(time.day() as u8)
        .hour(time.hour() as u8)
        .minute(time.minute() as u8)
        .second(time.second() as u8)
        .utc_offset_hour((offset_minutes / 60) as i8)
        .utc_offset_minute((offset_minutes % 60).unsigned_abs() as u8)
}
