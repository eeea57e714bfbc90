use chrono::{DateTime, FixedOffset, Local, NaiveDate};

pub(crate) fn get_now() -> DateTime<FixedOffset> {
    let now = Local::now();
    now.with_timezone(now.offset())
}

pub(crate) fn get_today() -> NaiveDate {
    Local::now().date_naive()
}
