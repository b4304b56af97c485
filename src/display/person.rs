//! Person display formatting

use crate::config::Settings;
use crate::models::{Person, Role};

/// Format the merged people view as a table
pub fn format_people_list(people: &[Person]) -> String {
    if people.is_empty() {
        return "No people found.".to_string();
    }

    let id_width = people.iter().map(|p| p.id().len()).max().unwrap_or(2).max(2);
    let name_width = people
        .iter()
        .map(|p| p.info().full_name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<id_width$}  {:<name_width$}  {:<6}  {:<6}  {:<10}  {:>5}\n",
        "ID",
        "Name",
        "Role",
        "Gender",
        "Born",
        "Trips",
        id_width = id_width,
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<id_width$}  {:-<name_width$}  {:-<6}  {:-<6}  {:-<10}  {:->5}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        id_width = id_width,
        name_width = name_width,
    ));

    for person in people {
        let info = person.info();
        output.push_str(&format!(
            "{:<id_width$}  {:<name_width$}  {:<6}  {:<6}  {:<10}  {:>5}\n",
            info.id,
            info.full_name,
            person.role().as_str(),
            info.gender.as_str(),
            info.date_of_birth.to_string(),
            trip_count(person),
            id_width = id_width,
            name_width = name_width,
        ));
    }

    let hosts = people.iter().filter(|p| p.role() == Role::Host).count();
    output.push_str(&format!(
        "\n{} host(s), {} member(s)\n",
        hosts,
        people.len() - hosts
    ));

    output
}

/// Format a single person's profile
pub fn format_person_details(person: &Person, settings: &Settings) -> String {
    let info = person.info();
    let mut output = String::new();

    output.push_str(&format!("{}: {}\n", person.role(), info.full_name));
    output.push_str(&format!("  ID:             {}\n", info.id));
    output.push_str(&format!("  Gender:         {}\n", info.gender));
    output.push_str(&format!(
        "  Date of Birth:  {} (age {})\n",
        info.date_of_birth,
        info.age()
    ));
    if !info.email.is_empty() {
        output.push_str(&format!("  Email:          {}\n", info.email));
    }
    if !info.phone_number.is_empty() {
        output.push_str(&format!("  Phone:          {}\n", info.phone_number));
    }
    if !info.address.is_empty() {
        output.push_str(&format!("  Address:        {}\n", info.address));
    }

    match person {
        Person::Member(member) => {
            if !member.emergency_contact.is_empty() {
                output.push_str(&format!("  Emergency:      {}\n", member.emergency_contact));
            }
            output.push_str(&format!(
                "  Driver License: {}\n",
                if member.has_driver_license { "Yes" } else { "No" }
            ));
            if !member.interests.is_empty() {
                output.push_str(&format!("  Interests:      {}\n", member.interests.join(", ")));
            }

            output.push('\n');
            output.push_str(&format!(
                "  Joined Trips:   {}\n",
                list_or_none(&member.joined_trip_ids)
            ));
            output.push_str(&format!(
                "  Total Spent:    {}\n",
                settings.format_money(member.total_spent())
            ));
            for spending in member.spendings() {
                output.push_str(&format!(
                    "    {}  {}  {}\n",
                    spending.trip_id,
                    spending.expense.category,
                    settings.format_money(spending.expense.amount)
                ));
            }
        }
        Person::Host(host) => {
            if !host.emergency_contact.is_empty() {
                output.push_str(&format!("  Emergency:      {}\n", host.emergency_contact));
            }

            output.push('\n');
            output.push_str(&format!(
                "  Hosted Trips:   {}\n",
                list_or_none(&host.hosted_trip_ids)
            ));
        }
    }

    output
}

fn trip_count(person: &Person) -> usize {
    match person {
        Person::Member(m) => m.joined_trip_count(),
        Person::Host(h) => h.hosted_trip_ids.len(),
    }
}

fn list_or_none(ids: &[String]) -> String {
    if ids.is_empty() {
        "none".to_string()
    } else {
        ids.join(", ")
    }
}
