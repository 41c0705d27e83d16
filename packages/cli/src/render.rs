use anyhow::Result;
use common::{ContestDraft, Problem, VirtualContestDetails, VirtualContestInfo};
use console::style;
use contest::view::FormView;
use contest::{DateTimeFields, Page, View};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_view(view: &View, json: bool) -> Result<()> {
    if json {
        return print_json(view);
    }
    match view {
        View::Redirect { to } => println!("{} {}", style("redirect").yellow(), to),
        View::Empty => {}
        View::Form(form) => print_form(form),
    }
    Ok(())
}

fn print_form(form: &FormView) {
    println!("{}", style(&form.page_title).bold().underlined());
    println!("  {:<12} {}", "Title", form.title);
    println!("  {:<12} {}", "Description", form.memo);
    println!("  {:<12} {}", "Mode", form.mode_label);
    println!(
        "  {:<12} {} {:02}:{:02}",
        "Start", form.start.date, form.start.hour, form.start.minute
    );
    println!(
        "  {:<12} {} {:02}:{:02}",
        "End", form.end.date, form.end.hour, form.end.minute
    );
    println!("  Problems");
    if form.rows.is_empty() {
        println!("    {}", style("(none)").dim());
    }
    for row in &form.rows {
        let name = match &row.link {
            Some(link) => format!("{} {}", link.title, style(&link.url).dim()),
            None => row.problem_id.clone(),
        };
        let point = match row.point {
            Some(point) => point.to_string(),
            None => "default".to_string(),
        };
        println!("    {:>2}. {:<16} {:<8} {}", row.index + 1, row.problem_id, point, name);
    }
    let button = format!("[ {} ]", form.submit.label);
    if form.submit.enabled {
        println!("{}", style(button).green().bold());
    } else {
        println!("{}", style(button).dim());
    }
}

pub fn print_search_results(results: &[&Problem]) {
    if results.is_empty() {
        println!("{}", style("No matching problems").dim());
    }
    for (i, problem) in results.iter().enumerate() {
        println!(
            "{:>2}. {:<16} {} {}",
            i,
            problem.id,
            problem.title,
            style(format!("({})", problem.contest_id)).dim()
        );
    }
}

pub fn print_page(page: &Page, json: bool) -> Result<()> {
    if json {
        return print_json(page);
    }
    println!("{:?}", page.route);
    if let Some(user_id) = &page.user_id {
        println!("  user:   {user_id}");
    }
    if !page.rivals.is_empty() {
        println!("  rivals: {}", page.rivals.join(", "));
    }
    Ok(())
}

pub fn print_draft(draft: &ContestDraft) -> Result<()> {
    print_json(draft)
}

fn jst(second: i64) -> String {
    match DateTimeFields::from_unix_second(second) {
        Some(t) => format!("{} {:02}:{:02}", t.date, t.hour, t.minute),
        None => second.to_string(),
    }
}

pub fn print_contests(contests: &[VirtualContestInfo], json: bool) -> Result<()> {
    if json {
        return print_json(&contests);
    }
    if contests.is_empty() {
        println!("{}", style("No contests").dim());
    }
    for contest in contests {
        println!(
            "{}  {} {}  {}",
            jst(contest.start_epoch_second),
            style(&contest.title).bold(),
            style(format!("[{}]", contest.mode)).dim(),
            style(&contest.id).dim()
        );
    }
    Ok(())
}

pub fn print_details(details: &VirtualContestDetails, json: bool) -> Result<()> {
    if json {
        return print_json(details);
    }
    let info = &details.info;
    println!("{}", style(&info.title).bold().underlined());
    if !info.memo.is_empty() {
        println!("  {}", info.memo);
    }
    println!("  {:<12} {}", "Owner", info.owner_user_id);
    println!("  {:<12} {}", "Mode", info.mode);
    println!("  {:<12} {}", "Start", jst(info.start_epoch_second));
    println!("  {:<12} {}", "End", jst(info.end_epoch_second()));
    println!("  Problems");
    for (i, item) in details.problems.iter().enumerate() {
        let point = match item.point {
            Some(point) => point.to_string(),
            None => "default".to_string(),
        };
        println!("    {:>2}. {:<16} {}", i + 1, item.id, point);
    }
    println!("  {:<12} {}", "Participants", details.participants.len());
    Ok(())
}
