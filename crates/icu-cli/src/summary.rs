use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use icu_model::{Metric, NOT_APPLICABLE, QualitySummary, Rate};

use crate::commands::ReportOutcome;

pub fn print_summary(outcome: &ReportOutcome) {
    let summary = &outcome.report.summary;
    println!("Site: {}", summary.site_name);
    println!("Unit: {}", summary.location_name);
    println!("Period: {} to {}", summary.period_start, summary.period_end);
    match &outcome.paths {
        Some(paths) => {
            println!("Output: {}", outcome.output_dir.display());
            for path in paths.all() {
                println!("  {}", path.display());
            }
        }
        None => println!("Output: (dry run)"),
    }

    print_census_table(summary);
    print_trial_table(summary);
    print_lpv_table(summary);

    if outcome.report.unmatched_discharges > 0 {
        eprintln!(
            "Note: {} discharge(s) had no matching hospitalization outcome.",
            outcome.report.unmatched_discharges
        );
    }
}

fn print_census_table(summary: &QualitySummary) {
    let census = &summary.census;
    let mut table = metric_table("Census & flow");
    add_row(&mut table, "Days", Cell::new(census.days));
    add_row(&mut table, "Admissions", Cell::new(census.total_admissions));
    add_row(&mut table, "Mean census 7AM", metric_cell(census.daily_census));
    add_row(&mut table, "Mean census 7PM", metric_cell(census.mean_census_7pm));
    add_row(&mut table, "Discharges", Cell::new(census.total_discharges));
    add_row(&mut table, "Floor transfers", Cell::new(census.floor_transfers));
    add_row(&mut table, "Deaths in ICU", Cell::new(census.deaths_in_icu));
    add_row(&mut table, "Discharges to hospice", Cell::new(census.discharges_to_hospice));
    add_row(&mut table, "Discharges to facility", Cell::new(census.discharges_to_facility));
    add_row(&mut table, "Bed strain %", metric_cell(census.bed_strain_pct));
    println!("{table}");
}

fn print_trial_table(summary: &QualitySummary) {
    let mut table = metric_table("Ventilation trials");
    add_row(&mut table, "Ventilated days", Cell::new(summary.trial_days));
    add_row(&mut table, "Hospitalizations", Cell::new(summary.hospitalizations));
    add_row(&mut table, "SAT eligible days", Cell::new(summary.sat.eligible_days));
    add_row(&mut table, "SAT complete cessation", rate_cell(summary.sat.complete_cessation));
    add_row(&mut table, "SAT sedative cessation", rate_cell(summary.sat.sedative_cessation));
    add_row(&mut table, "SAT dose reduction", rate_cell(summary.sat.dose_reduction));
    add_row(&mut table, "SAT no change, agitated", rate_cell(summary.sat.no_change_agitated));
    add_row(&mut table, "SAT sedated to awake", rate_cell(summary.sat.sedated_to_awake));
    add_row(&mut table, "SBT eligible days", Cell::new(summary.sbt.eligible_days));
    add_row(&mut table, "SBT pressure support", rate_cell(summary.sbt.pressure_support_trial));
    add_row(&mut table, "Successful extubation", rate_cell(summary.sbt.successful_extubation));
    add_row(&mut table, "Failed extubation", rate_cell(summary.sbt.failed_extubation));
    add_row(&mut table, "First extubations", Cell::new(summary.sbt.first_extubations));
    add_row(&mut table, "Tracheostomies", Cell::new(summary.sbt.tracheostomies));
    println!("{table}");
}

fn print_lpv_table(summary: &QualitySummary) {
    let lpv = &summary.lpv;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Mode"),
        header_cell("Records"),
        header_cell("Valid"),
        header_cell("Low TV"),
        header_cell("Low TV %"),
    ]);
    apply_summary_table_style(&mut table);
    for column in 1..5 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for row in &lpv.by_mode {
        table.add_row(vec![
            Cell::new(&row.mode_category),
            Cell::new(row.total_rows),
            Cell::new(row.valid_rows),
            Cell::new(row.low_tv_rows),
            metric_cell(row.low_tv_pct),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(lpv.total_controlled_mode_rows).add_attribute(Attribute::Bold),
        Cell::new(lpv.rows_with_valid_data).add_attribute(Attribute::Bold),
        Cell::new(lpv.low_tv_rows).add_attribute(Attribute::Bold),
        metric_cell(lpv.low_tv_percentage).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    println!("Median tidal volume: {} mL/kg IBW", lpv.median_ml_per_kg);
}

fn metric_table(title: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell(title), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table
}

fn add_row(table: &mut Table, label: &str, value: Cell) {
    table.add_row(vec![Cell::new(label), value]);
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
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

fn metric_cell(metric: Metric) -> Cell {
    match metric {
        Metric::Value(_) => Cell::new(metric),
        Metric::NotApplicable => dim_cell(NOT_APPLICABLE),
    }
}

fn rate_cell(rate: Rate) -> Cell {
    if rate.denominator == 0 {
        dim_cell(NOT_APPLICABLE)
    } else {
        Cell::new(rate)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
