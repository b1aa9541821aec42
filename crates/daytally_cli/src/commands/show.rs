use anyhow::Result;
use daytally_core::db::Connection;
use daytally_core::{
    parse_requested_month, MonthView, MonthViewService, SqliteEntryRepository, SystemClock,
    YearMonth,
};

use super::principal_for;

/// Print one month of values for `username`.
///
/// `year`/`month` are taken verbatim; anything unparseable shows the
/// current month, and out-of-range months are clamped.
pub fn run(
    conn: &Connection,
    username: &str,
    year: Option<&str>,
    month: Option<&str>,
    json: bool,
) -> Result<()> {
    let principal = principal_for(conn, username)?;
    let service = MonthViewService::new(SqliteEntryRepository::try_new(conn)?, SystemClock);

    let requested = match (year, month) {
        (Some(year), Some(month)) => parse_requested_month(year, month),
        _ => None,
    };
    let view = service.month_view(principal, requested)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_month(&view));
    }
    Ok(())
}

/// Plain-text month listing: header, navigation, one line per day.
pub fn render_month(view: &MonthView) -> String {
    let nav = |month: Option<YearMonth>| month.map_or_else(|| "-".to_string(), |m| m.to_string());

    let mut out = format!(
        "{}  (history {} .. {})\nprev: {}  next: {}\n",
        view.effective,
        view.floor,
        view.ceiling,
        nav(view.previous()),
        nav(view.next())
    );
    for (day, value) in view.days() {
        let cell = value.map_or_else(|| "-".to_string(), |value| value.to_string());
        out.push_str(&format!("{day:>3}  {cell:>4}\n"));
    }
    out.push_str(&format!("total: {}\n", view.total()));
    out
}

#[cfg(test)]
mod tests {
    use super::render_month;
    use daytally_core::{DateKey, Entry, EntryValue, MonthView, Principal, YearMonth};

    #[test]
    fn render_lists_every_day_and_navigation() {
        let principal = Principal::new(1);
        let view = MonthView {
            effective: YearMonth::new(2024, 4).unwrap(),
            floor: YearMonth::new(2024, 4).unwrap(),
            ceiling: YearMonth::new(2024, 11).unwrap(),
            days_in_month: 30,
            entries: vec![Entry::new(
                principal,
                DateKey::new(2024, 4, 2).unwrap(),
                EntryValue::new(12).unwrap(),
            )],
        };

        let text = render_month(&view);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "2024-04  (history 2024-04 .. 2024-11)");
        assert_eq!(lines[1], "prev: -  next: 2024-05");
        assert_eq!(lines[2], "  1     -");
        assert_eq!(lines[3], "  2    12");
        assert_eq!(lines.len(), 2 + 30 + 1);
        assert_eq!(lines[32], "total: 12");
    }
}
