use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use trialsim_core::{
    AgeStatistics, ArmGroup, CategoryCounts, ConsistencyReport, SubjectListing, TableKind,
    VitalSignMeans,
};
use trialsim_model::{DispositionClass, format_date};

use crate::types::{GenerationResult, SummaryReport};

pub fn print_generation(result: &GenerationResult) {
    println!("Study: {}", result.study_id);
    println!("Seed: {}", result.seed);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Path"),
        header_cell("Records"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    let mut total = 0usize;
    for output in &result.tables {
        total += output.records;
        table.add_row(vec![
            table_cell(output.table),
            Cell::new(output.path.display()),
            Cell::new(output.records),
        ]);
    }
    if result.tables.len() > 1 {
        table.add_row(vec![
            Cell::new("TOTAL")
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            dim_cell("-"),
            Cell::new(total).add_attribute(Attribute::Bold),
        ]);
    }
    println!("{table}");

    if let Some(classes) = &result.classes {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Disposition"), header_cell("Subjects")]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        for (class, count) in classes {
            table.add_row(vec![class_cell(*class), count_cell(*count, Color::White)]);
        }
        println!("{table}");
    }
}

pub fn print_summary(report: &SummaryReport) {
    let counts = &report.counts;
    let mut table = Table::new();
    let mut header = vec![header_cell("Characteristic"), header_cell("Statistic")];
    header.extend(ArmGroup::ALL.iter().map(|group| header_cell(group.label())));
    table.set_header(header);
    apply_summary_table_style(&mut table);
    for index in 2..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    table.add_row(group_row(
        "Number of Subjects",
        "N",
        |group| Cell::new(counts.randomized(group)),
    ));
    table.add_row(group_row("Age (years)", "Non-missing", |group| {
        stat_cell(report.ages.get(group), |stats| stats.n.to_string())
    }));
    table.add_row(group_row("", "Missing", |group| {
        count_cell(report.ages.missing(group), Color::Yellow)
    }));
    table.add_row(group_row("", "Mean (SD)", |group| {
        stat_cell(report.ages.get(group), |stats| {
            format!("{:.2} ({:.2})", stats.mean, stats.sd)
        })
    }));
    table.add_row(group_row("", "Median", |group| {
        stat_cell(report.ages.get(group), |stats| format!("{:.0}", stats.median))
    }));
    table.add_row(group_row("", "Minimum", |group| {
        stat_cell(report.ages.get(group), |stats| format!("{:.0}", stats.min))
    }));
    table.add_row(group_row("", "Maximum", |group| {
        stat_cell(report.ages.get(group), |stats| format!("{:.0}", stats.max))
    }));
    add_category_rows(&mut table, "Sex", &report.sexes);
    add_category_rows(&mut table, "Race", &report.races);
    println!("{table}");
    println!(
        "Of the {} screened subjects, {} were excluded at screening and are not counted.",
        counts.screened, counts.screen_failures
    );

    print_blood_pressure(&report.blood_pressure);
}

pub fn print_listing(listing: &SubjectListing) {
    for arm in &listing.arms {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("SiteID-SubjectID"),
            header_cell("Date of Birth"),
            header_cell("Age (Years)"),
            header_cell("Gender"),
            header_cell("Ethnicity"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 2, CellAlignment::Right);
        for row in &arm.rows {
            table.add_row(vec![
                Cell::new(&row.site_subject),
                optional_cell(row.birth_date.map(format_date)),
                optional_cell(row.age),
                optional_cell(row.sex.as_deref()),
                optional_cell(row.race.as_deref()),
            ]);
        }
        println!("Treatment Group: {}", arm.label);
        println!("{table}");
        println!();
    }
    println!(
        "Of the original {} screened subjects, {} were excluded at Screening and are not shown.",
        listing.screened, listing.screen_failures
    );
}

pub fn print_check(report: &ConsistencyReport) {
    if report.is_clean() {
        println!(
            "No consistency issues across {} subjects.",
            report.subjects_checked
        );
        return;
    }

    let mut totals = Table::new();
    totals.set_header(vec![header_cell("Table"), header_cell("Issues")]);
    apply_table_style(&mut totals);
    align_column(&mut totals, 1, CellAlignment::Right);
    for (table, count) in report.counts() {
        totals.add_row(vec![
            table_cell(table.as_str()),
            count_cell(count, Color::Red),
        ]);
    }
    println!("{totals}");

    let mut issues = Table::new();
    issues.set_header(vec![
        header_cell("Table"),
        header_cell("Subject"),
        header_cell("Issue"),
    ]);
    apply_issue_table_style(&mut issues);
    let mut ordered: Vec<_> = report.issues.iter().collect();
    ordered.sort_by(|a, b| (a.table, &a.subject_key).cmp(&(b.table, &b.subject_key)));
    for issue in ordered {
        issues.add_row(vec![
            table_kind_cell(issue.table),
            Cell::new(&issue.subject_key),
            Cell::new(&issue.message),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{issues}");
}

fn print_blood_pressure(means: &VitalSignMeans) {
    if means.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Arm"),
        header_cell("Test"),
        header_cell("Visit"),
        header_cell("N"),
        header_cell("Mean"),
    ]);
    apply_table_style(&mut table);
    for index in 2..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (key, mean) in &means.means {
        table.add_row(vec![
            Cell::new(key.group.label()),
            Cell::new(&key.test_code),
            Cell::new(key.visit),
            Cell::new(mean.n),
            Cell::new(format!("{:.1}", mean.mean)),
        ]);
    }
    println!();
    println!("Blood pressure by visit and arm:");
    println!("{table}");
}

fn add_category_rows(table: &mut Table, label: &str, counts: &CategoryCounts) {
    for (index, value) in counts.values().into_iter().enumerate() {
        let characteristic = if index == 0 { label } else { "" };
        table.add_row(group_row(characteristic, value, |group| {
            match counts.get(value, group) {
                Some(count) => Cell::new(format!("{} ({:.2}%)", count.count, count.percent)),
                None => dim_cell("0"),
            }
        }));
    }
}

fn group_row<F>(characteristic: &str, statistic: &str, cell_for: F) -> Vec<Cell>
where
    F: Fn(ArmGroup) -> Cell,
{
    let mut row = vec![
        Cell::new(characteristic).add_attribute(Attribute::Bold),
        Cell::new(statistic),
    ];
    row.extend(ArmGroup::ALL.into_iter().map(cell_for));
    row
}

fn stat_cell<F>(stats: Option<&AgeStatistics>, render: F) -> Cell
where
    F: Fn(&AgeStatistics) -> String,
{
    match stats {
        Some(stats) => Cell::new(render(stats)),
        None => dim_cell("-"),
    }
}

fn optional_cell<T: ToString>(value: Option<T>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell(""),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn class_cell(class: DispositionClass) -> Cell {
    match class {
        DispositionClass::ScreenFail => Cell::new(class).fg(Color::Yellow),
        DispositionClass::Withdrawn => Cell::new(class).fg(Color::Magenta),
        DispositionClass::Completer => Cell::new(class).fg(Color::Green),
    }
}

fn table_kind_cell(kind: TableKind) -> Cell {
    table_cell(kind.as_str())
}

fn table_cell(name: &str) -> Cell {
    Cell::new(name)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
