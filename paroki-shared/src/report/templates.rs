/// Report templates
///
/// Each function builds a [`ReportDocument`] from already-loaded rows. Dates
/// are printed in Indonesian long form and times as `HH:MM`.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Serialize;

use super::{Column, ReportDocument};
use crate::calendar::{format_long_date, weekday_name, DateRange, RangePreset};
use crate::models::activity::Activity;
use crate::models::user::UserWithCommunity;
use crate::models::worship_schedule::WorshipScheduleWithCommunities;

/// Counts printed in the activity report summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ActivityReportStats {
    pub total_count: usize,

    /// Activities in the range that fall in the current calendar month
    pub this_month_count: usize,
}

pub fn activity_stats(activities: &[Activity], today: NaiveDate) -> ActivityReportStats {
    let this_month_count = activities
        .iter()
        .filter(|a| a.date.year() == today.year() && a.date.month() == today.month())
        .count();

    ActivityReportStats {
        total_count: activities.len(),
        this_month_count,
    }
}

/// Activities in a period, chronological
pub fn activity_report(
    organisation: &str,
    preset: RangePreset,
    range: DateRange,
    activities: &[Activity],
    today: NaiveDate,
) -> ReportDocument {
    let stats = activity_stats(activities, today);

    let mut doc = ReportDocument::new(organisation, "Laporan Kegiatan")
        .with_subtitle(format!("Periode: {} ({})", range.describe(), preset.label()))
        .with_columns(vec![
            Column::new("No", 0.5),
            Column::new("Nama Kegiatan", 2.5),
            Column::new("Tanggal", 1.8),
            Column::new("Waktu", 0.8),
            Column::new("Lokasi", 1.6),
        ])
        .with_empty_message("Tidak ada data kegiatan")
        .with_footer(printed_on(today));

    for (i, activity) in activities.iter().enumerate() {
        doc.push_row(vec![
            (i + 1).to_string(),
            activity.name.clone(),
            day_and_date(activity.date),
            short_time(activity.start_time),
            activity.location.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }

    doc.push_summary("Total Kegiatan", stats.total_count);
    doc.push_summary("Kegiatan Bulan Ini", stats.this_month_count);
    doc
}

/// Member roster grouped by community order
pub fn user_roster(organisation: &str, users: &[UserWithCommunity], today: NaiveDate) -> ReportDocument {
    let mut doc = ReportDocument::new(organisation, "Daftar Umat")
        .with_columns(vec![
            Column::new("No", 0.5),
            Column::new("Nama", 2.0),
            Column::new("Email", 2.2),
            Column::new("Lingkungan", 1.6),
            Column::new("Peran", 0.8),
            Column::new("Status", 1.0),
        ])
        .with_empty_message("Tidak ada data umat")
        .with_footer(printed_on(today));

    for (i, row) in users.iter().enumerate() {
        doc.push_row(vec![
            (i + 1).to_string(),
            row.user.name.clone(),
            row.user.email.clone(),
            row.community_name.clone(),
            row.user.role.label().to_string(),
            row.user.status.label().to_string(),
        ]);
    }

    doc.push_summary("Total Umat", users.len());
    doc
}

/// Single member detail card
pub fn user_card(organisation: &str, row: &UserWithCommunity, today: NaiveDate) -> ReportDocument {
    let user = &row.user;
    let dash = || "-".to_string();

    let mut doc = ReportDocument::new(organisation, "Data Umat")
        .with_subtitle(user.name.clone())
        .with_columns(vec![Column::new("Data", 1.0), Column::new("Keterangan", 2.5)])
        .with_footer(printed_on(today));

    let fields = [
        ("Nama", user.name.clone()),
        ("Email", user.email.clone()),
        ("Lingkungan", row.community_name.clone()),
        ("Peran", user.role.label().to_string()),
        ("Status", user.status.label().to_string()),
        ("Alamat", user.address.clone().unwrap_or_else(dash)),
        ("Tanggal Lahir", user.birth_date.map(format_long_date).unwrap_or_else(dash)),
        ("Jenis Kelamin", user.gender.map(|g| g.label().to_string()).unwrap_or_else(dash)),
        ("Telepon", user.phone.clone().unwrap_or_else(dash)),
        ("Terdaftar", format_long_date(user.created_at.date_naive())),
    ];

    for (label, value) in fields {
        doc.push_row(vec![label.to_string(), value]);
    }

    doc
}

/// Worship schedules in a period with their communities
pub fn worship_schedule_listing(
    organisation: &str,
    preset: RangePreset,
    range: DateRange,
    schedules: &[WorshipScheduleWithCommunities],
    today: NaiveDate,
) -> ReportDocument {
    let mut doc = ReportDocument::new(organisation, "Jadwal Ibadah")
        .with_subtitle(format!("Periode: {} ({})", range.describe(), preset.label()))
        .with_columns(vec![
            Column::new("No", 0.5),
            Column::new("Ibadah", 2.0),
            Column::new("Tanggal", 1.8),
            Column::new("Waktu", 0.8),
            Column::new("Petugas", 1.5),
            Column::new("Lingkungan", 2.0),
        ])
        .with_empty_message("Tidak ada data jadwal ibadah")
        .with_footer(printed_on(today));

    for (i, item) in schedules.iter().enumerate() {
        doc.push_row(vec![
            (i + 1).to_string(),
            item.schedule.name.clone(),
            day_and_date(item.schedule.date),
            short_time(item.schedule.start_time),
            item.schedule.person_in_charge.clone(),
            item.community_names(),
        ]);
    }

    doc.push_summary("Total Jadwal", schedules.len());
    doc
}

fn printed_on(today: NaiveDate) -> String {
    format!("Dicetak pada {}", format_long_date(today))
}

fn day_and_date(date: NaiveDate) -> String {
    format!("{}, {}", weekday_name(date), format_long_date(date))
}

fn short_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::html::render_html;
    use chrono::Utc;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn activity(name: &str, on: NaiveDate) -> Activity {
        Activity {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            date: on,
            start_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            location: None,
            image_path: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_activity_report() {
        let today = date(2025, 3, 12);
        let range = RangePreset::Month.resolve(today, None, None).unwrap();
        let doc = activity_report("Paroki", RangePreset::Month, range, &[], today);

        assert!(doc.is_empty());
        assert_eq!(doc.empty_message, "Tidak ada data kegiatan");
        assert_eq!(doc.summary[0].label, "Total Kegiatan");
        assert_eq!(doc.summary[0].value, "0");

        let html = render_html(&doc);
        assert!(html.contains("Tidak ada data kegiatan"));
        assert!(html.contains("1 Maret 2025 - 31 Maret 2025"));
    }

    #[test]
    fn test_activity_stats_count_current_month() {
        let today = date(2025, 3, 12);
        let activities = vec![
            activity("Rekoleksi", date(2025, 2, 20)),
            activity("Ziarah", date(2025, 3, 1)),
            activity("Bakti Sosial", date(2025, 3, 30)),
            activity("Natal", date(2024, 3, 15)),
        ];

        let stats = activity_stats(&activities, today);
        assert_eq!(stats.total_count, 4);
        assert_eq!(stats.this_month_count, 2);
    }

    #[test]
    fn test_activity_rows() {
        let today = date(2025, 3, 12);
        let range = RangePreset::Year.resolve(today, None, None).unwrap();
        let doc = activity_report(
            "Paroki",
            RangePreset::Year,
            range,
            &[activity("Ziarah", date(2025, 3, 16))],
            today,
        );

        assert_eq!(
            doc.rows[0],
            vec!["1", "Ziarah", "Minggu, 16 Maret 2025", "09:30", "-"]
        );
        assert_eq!(doc.summary[1].value, "1");
    }
}
