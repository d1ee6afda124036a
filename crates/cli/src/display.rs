//! Plain-text and JSON rendering of command results

use anyhow::Result;
use ellp_core::{Page, User, Volunteer, Workshop};
use serde::Serialize;

/// Print `value` as pretty JSON
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn user(user: &User) {
    println!("{} <{}>", user.name, user.email);
    println!("  id:   {}", user.id);
    println!("  role: {:?}", user.role);
}

pub fn volunteer(v: &Volunteer) {
    println!("{} <{}>", v.name, v.email);
    println!("  id:         {}", v.id);
    println!("  phone:      {}", v.phone.as_deref().unwrap_or("-"));
    println!("  status:     {}", if v.is_active { "active" } else { "inactive" });
    println!("  entry date: {}", v.entry_date.date_naive());
    if let Some(exit_date) = v.exit_date {
        println!("  exit date:  {}", exit_date.date_naive());
    }
    match v.academic_info() {
        Some((course, ra)) => println!(
            "  academic:   {} (RA {})",
            course.unwrap_or("-"),
            ra.unwrap_or("-")
        ),
        None => println!("  academic:   no"),
    }
    println!("  workshops:  {}", v.workshop_count());
}

pub fn workshop(w: &Workshop) {
    println!("{} ({})", w.name, w.date);
    println!("  id:          {}", w.id);
    if let Some(description) = &w.description {
        println!("  description: {description}");
    }
    println!("  volunteers:  {}", w.volunteers.len());
}

pub fn volunteer_rows(volunteers: &[Volunteer]) {
    for v in volunteers {
        println!(
            "{:<26} {:<32} {:<30} {:>3}  {}",
            v.id,
            v.name,
            v.email,
            v.workshop_count(),
            if v.is_active { "active" } else { "inactive" }
        );
    }
}

pub fn workshop_rows(workshops: &[Workshop]) {
    for w in workshops {
        println!(
            "{:<26} {:<40} {}  {:>3} volunteers",
            w.id,
            w.name,
            w.date,
            w.volunteers.len()
        );
    }
}

pub fn page_footer<T>(page: &Page<T>) {
    println!(
        "page {}/{} ({} total){}",
        page.page,
        page.total_pages,
        page.total_items,
        if page.has_next() { ", use --page for more" } else { "" }
    );
}
