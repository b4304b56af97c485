//! Trip display formatting
//!
//! Formats trips for terminal output in table and detail views.

use crate::config::Settings;
use crate::models::{Money, Trip};
use crate::services::TripDetails;

/// Format a list of trips as a table
pub fn format_trip_list(trips: &[&Trip], settings: &Settings) -> String {
    if trips.is_empty() {
        return "No trips found.".to_string();
    }

    let id_width = trips.iter().map(|t| t.id.len()).max().unwrap_or(2).max(2);
    let dest_width = trips
        .iter()
        .map(|t| t.destination().chars().count())
        .max()
        .unwrap_or(11)
        .max(11);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<id_width$}  {:<dest_width$}  {:<10}  {:<10}  {:<9}  {:>7}  {:>16}\n",
        "ID",
        "Destination",
        "Start",
        "End",
        "Status",
        "Members",
        "Expenses",
        id_width = id_width,
        dest_width = dest_width,
    ));
    output.push_str(&format!(
        "{:-<id_width$}  {:-<dest_width$}  {:-<10}  {:-<10}  {:-<9}  {:->7}  {:->16}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        id_width = id_width,
        dest_width = dest_width,
    ));

    for trip in trips {
        output.push_str(&format!(
            "{:<id_width$}  {:<dest_width$}  {:<10}  {:<10}  {:<9}  {:>7}  {:>16}\n",
            trip.id,
            trip.destination(),
            trip.start_date.to_string(),
            trip.end_date.to_string(),
            trip.status.as_str(),
            trip.member_ids().len(),
            settings.format_money(trip.total_expense()),
            id_width = id_width,
            dest_width = dest_width,
        ));
    }

    let total: Money = trips.iter().map(|t| t.total_expense()).sum();
    output.push_str(&format!(
        "\n{} trip(s), {} in expenses\n",
        trips.len(),
        settings.format_money(total)
    ));

    output
}

/// Format one trip with its host, members and expenses
pub fn format_trip_details(details: &TripDetails, settings: &Settings) -> String {
    let trip = &details.trip;
    let mut output = String::new();

    output.push_str(&format!("Trip: {}\n", trip.id));
    output.push_str(&format!("  Destination:  {}\n", trip.destination()));
    output.push_str(&format!("  Dates:        {} - {}\n", trip.start_date, trip.end_date));
    if let Some(days) = trip.duration_days() {
        output.push_str(&format!("  Duration:     {} day(s)\n", days));
    }
    output.push_str(&format!("  Status:       {}\n", trip.status));
    if !trip.description.is_empty() {
        output.push_str(&format!("  Description:  {}\n", trip.description));
    }

    output.push('\n');
    match &details.host {
        Some(host) => output.push_str(&format!("  Host: {} ({})\n", host.full_name(), host.id())),
        None => output.push_str("  Host: none\n"),
    }

    output.push_str(&format!("  Members ({}):\n", details.members.len()));
    for (member, spent) in details.spending_by_member() {
        output.push_str(&format!(
            "    {:<24} {:<12} {:>16}\n",
            member.full_name(),
            member.id(),
            settings.format_money(spent)
        ));
    }

    if !details.missing.is_empty() {
        output.push_str(&format!("  Unknown people: {}\n", details.missing.join(", ")));
    }

    output.push('\n');
    output.push_str(&format_expenses(trip, settings));

    output
}

/// Format a trip's expenses with their index, as used by `remove-expense`
pub fn format_expenses(trip: &Trip, settings: &Settings) -> String {
    if trip.expenses().is_empty() {
        return "  No expenses recorded.\n".to_string();
    }

    let mut output = String::from("  Expenses:\n");
    for (index, expense) in trip.expenses().iter().enumerate() {
        output.push_str(&format!(
            "    [{}] {}  {:<13} {:>16}  {:<12} {}\n",
            index,
            expense.date,
            expense.category.as_str(),
            settings.format_money(expense.amount),
            expense.person_in_charge,
            expense.note
        ));
    }
    output.push_str(&format!(
        "  Total: {}\n",
        settings.format_money(trip.total_expense())
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expense, ExpenseCategory, Gender, Member, TripDate};

    fn sample_trip() -> Trip {
        let mut trip = Trip::create(
            "Paris",
            "Summer",
            TripDate::new(1, 6, 2025),
            TripDate::new(7, 6, 2025),
        );
        trip.add_member("AB_0202");
        trip.add_expense(Expense::new(
            TripDate::new(2, 6, 2025),
            ExpenseCategory::Food,
            Money::from_vnd(500_000),
            "Dinner",
            "AB_0202",
        ));
        trip
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_trip_list(&[], &Settings::default()), "No trips found.");
    }

    #[test]
    fn test_list_contains_rows_and_total() {
        let trip = sample_trip();
        let output = format_trip_list(&[&trip], &Settings::default());

        assert!(output.contains("PARIS_0601"));
        assert!(output.contains("01/06/2025"));
        assert!(output.contains("Planned"));
        assert!(output.contains("1 trip(s), 500.000 VND in expenses"));
    }

    #[test]
    fn test_details() {
        let details = TripDetails {
            trip: sample_trip(),
            host: None,
            members: vec![Member::create(
                "Ann Bee",
                Gender::Female,
                TripDate::new(2, 2, 1992),
            )],
            missing: vec!["JS_0101".into()],
        };

        let output = format_trip_details(&details, &Settings::default());
        assert!(output.contains("Trip: PARIS_0601"));
        assert!(output.contains("Duration:     7 day(s)"));
        assert!(output.contains("Host: none"));
        assert!(output.contains("Ann Bee"));
        assert!(output.contains("Unknown people: JS_0101"));
        assert!(output.contains("[0] 02/06/2025"));
        assert!(output.contains("Total: 500.000 VND"));
    }

    #[test]
    fn test_amounts_follow_settings() {
        let settings = Settings {
            currency_label: "đ".into(),
            thousands_separator: ',',
            ..Settings::default()
        };
        let trip = sample_trip();

        let output = format_expenses(&trip, &settings);
        assert!(output.contains("500,000 đ"));
        assert!(output.contains("Total: 500,000 đ"));

        let list = format_trip_list(&[&trip], &settings);
        assert!(list.contains("1 trip(s), 500,000 đ in expenses"));
    }
}
