use std::fmt::Write;

use crate::meal_plan::GroceryGuide;
use crate::session::{Level, Notification, SessionState, View, Workflow, WorkflowStatus};

pub fn notification(note: &Notification) -> String {
    let marker = match note.level {
        Level::Loading => "…",
        Level::Success => "✓",
        Level::Error => "✗",
    };
    format!("{marker} {}", note.message)
}

pub fn status(state: &SessionState) -> String {
    let mut out = String::new();
    for workflow in Workflow::ALL {
        let label = match state.workflows.status(workflow) {
            WorkflowStatus::Idle => "idle".to_string(),
            WorkflowStatus::Running { request_id } => format!("running (#{request_id})"),
            WorkflowStatus::Succeeded { request_id } => format!("succeeded (#{request_id})"),
            WorkflowStatus::Failed { request_id } => format!("failed (#{request_id})"),
        };
        let _ = writeln!(out, "{workflow:<20} {label}");
    }
    let _ = write!(out, "busy: {}", state.is_busy());
    out
}

pub fn view(state: &SessionState) -> String {
    let mut out = format!("[{}]\n", state.navigation.view);
    match state.navigation.view {
        View::Scan => scan(state, &mut out),
        View::Dashboard => dashboard(state, &mut out),
        View::GroceryGuide => grocery_guide(state, &mut out),
        View::Profile => profile(state, &mut out),
    }
    out.trim_end().to_string()
}

fn scan(state: &SessionState, out: &mut String) {
    match &state.image {
        Some(image) => {
            let _ = writeln!(
                out,
                "photo: {} ({}, {} bytes)",
                image.file_name(),
                image.media_type(),
                image.len()
            );
        }
        None => out.push_str("photo: none selected (use `photo <path>`)\n"),
    }
    if !state.profile.has_age() {
        out.push_str("set your age first: `profile age <years>`\n");
    }
}

fn dashboard(state: &SessionState, out: &mut String) {
    match &state.results.analysis {
        Some(result) => {
            if let Some(foods) = &result.identified_foods {
                let _ = writeln!(out, "identified: {foods}");
            }
            if !result.extracted_ingredients.is_empty() {
                let _ = writeln!(out, "ingredients: {}", result.extracted_ingredients.join(", "));
            }
            for line in result.nutrition.summary() {
                let _ = writeln!(out, "{:<10} {}", line.label, line.value);
            }
            let _ = writeln!(out, "daily progress: {}", result.daily_progress());
        }
        None => out.push_str("no analysis yet\n"),
    }
    match &state.results.meal_plan {
        Some(plan) => {
            let _ = writeln!(out, "\nmeal plan:\n{}", plan.text().trim_end());
        }
        None => out.push_str("no meal plan yet (use `plan`)\n"),
    }
}

fn grocery_guide(state: &SessionState, out: &mut String) {
    let Some(guide) = GroceryGuide::for_profile(&state.profile, &state.results.grocery_list)
    else {
        out.push_str("complete your profile first (`view profile`)\n");
        return;
    };
    for category in &guide.categories {
        let _ = writeln!(out, "{}:", category.title);
        for item in category.items {
            let _ = writeln!(out, "  - {item}");
        }
    }
    if !guide.shopping_list.is_empty() {
        out.push_str("Your shopping list:\n");
        for item in &guide.shopping_list {
            let _ = writeln!(out, "  [ ] {item}");
        }
    }
}

fn profile(state: &SessionState, out: &mut String) {
    let p = &state.profile;
    let age = p
        .age()
        .map(|a| a.to_string())
        .unwrap_or_else(|| "not set".into());
    let allergies = if p.allergies.is_empty() {
        "none".to_string()
    } else {
        p.allergies
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let _ = writeln!(out, "age:        {age}");
    let _ = writeln!(out, "sex:        {}", p.sex);
    let _ = writeln!(out, "diet:       {}", p.dietary_preference);
    let _ = writeln!(out, "goal:       {}", p.health_goal);
    let _ = writeln!(out, "meals:      {}", p.num_meals);
    let _ = writeln!(out, "allergies:  {allergies}");
}
