// Entry point and interactive menu.
//
// - Option [1] loads the finance workbook (cached after the first load).
// - Option [2] writes the ranking tables, the cost breakdown and the KPI
//   summary, and previews each one on the console.
// - Option [3] drops the cached workbook and reads it again from disk.
mod cache;
mod config;
mod error;
mod filter;
mod join;
mod loader;
mod metrics;
mod output;
mod reports;
mod schema;
mod types;
mod util;
mod workbook;

use cache::LoadCache;
use config::ReportConfig;
use filter::{distinct_values, Field};
use loader::Dataset;
use std::io::{self, Write};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use types::ProjectRecord;

struct App {
    config: ReportConfig,
    data: LoadCache<Dataset>,
}

fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Option [1]: load (or reuse) the workbook and print what was read.
fn handle_load(app: &mut App) {
    let cfg = app.config.clone();
    let cached = app.data.is_loaded();
    let data = match app.data.get_or_load(|| loader::load_dataset(&cfg)) {
        Ok(d) => d,
        Err(e) => {
            error!(error = %e, "workbook load failed");
            eprintln!("Failed to load workbook: {}\n", e);
            return;
        }
    };

    let report = &data.report;
    if cached {
        println!("Using cached workbook (option 3 reloads it from disk).");
    } else {
        info!(loads = app.data.loads(), "workbook cached");
    }
    println!(
        "Workbook loaded ({} project rows, {} cost rows)",
        util::format_int(report.project_rows),
        util::format_int(report.cost_rows)
    );
    if report.join.duplicates_dropped > 0 {
        println!(
            "Note: {} duplicate project rows ignored for the cost join.",
            util::format_int(report.join.duplicates_dropped)
        );
    }
    if report.join.unmatched_detail_rows > 0 {
        println!(
            "Note: {} cost rows have no matching project.",
            util::format_int(report.join.unmatched_detail_rows)
        );
    }
    if report.zeroed_amounts > 0 {
        println!(
            "Note: {} unreadable amounts were counted as 0.",
            util::format_int(report.zeroed_amounts)
        );
    }

    let all: Vec<&ProjectRecord> = data.projects.iter().collect();
    println!(
        "Filter options: {} companies, {} counterparties, {} countries\n",
        distinct_values(&all, Field::Company).len(),
        distinct_values(&all, Field::Counterparty).len(),
        distinct_values(&all, Field::Country).len()
    );
}

/// Option [2]: generate all report files and previews.
fn handle_generate_reports(app: &App) {
    let Some(data) = app.data.get() else {
        println!("Error: No data loaded. Please load the workbook first (option 1).\n");
        return;
    };
    let cfg = &app.config;
    let out = &cfg.output_dir;
    let preview = cfg.preview_rows;

    let projects = cfg.filter.apply(&data.projects);
    let costs = cfg.filter.apply(&data.costs);
    let kpi_projects = cfg.filter.for_cost_kpi().apply(&data.projects);
    info!(projects = projects.len(), cost_rows = costs.len(), "generating reports");

    println!("Generating reports...\n");

    let r1 = reports::project_order_ranking(&projects);
    let file1 = out.join("report1_project_orders.csv");
    if let Err(e) = output::write_csv(&file1, &r1) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 1: Projects by Order Amount\n");
    output::preview_table_rows(&r1, preview);
    println!("(Full table exported to {})\n", file1.display());

    let r2 = reports::counterparty_sales_ranking(&projects);
    let file2 = out.join("report2_counterparty_sales.csv");
    if let Err(e) = output::write_csv(&file2, &r2) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 2: Counterparty Sales\n");
    output::preview_table_rows(&r2, preview);
    println!("(Full table exported to {})\n", file2.display());

    let r3 = reports::project_cost_ranking(&costs);
    let file3 = out.join("report3_project_costs.csv");
    if let Err(e) = output::write_csv(&file3, &r3) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 3: Projects by Total Cost\n");
    output::preview_table_rows(&r3, preview);
    println!("(Full table exported to {})\n", file3.display());

    let detail = cfg
        .detail_project
        .clone()
        .or_else(|| r3.first().map(|r| r.project_code.clone()));
    if let Some(code) = detail {
        let r4 = reports::cost_breakdown(&costs, &code);
        let file4 = out.join("report4_cost_breakdown.csv");
        if let Err(e) = output::write_csv(&file4, &r4) {
            eprintln!("Write error: {}", e);
        }
        println!("Report 4: {} Cost Breakdown by Equipment\n", code);
        output::preview_table_rows(&r4, preview);
        println!("(Full table exported to {})\n", file4.display());
    }

    let r5: Vec<ProjectRecord> = projects.iter().map(|r| (*r).clone()).collect();
    let file5 = out.join("report5_project_details.csv");
    if let Err(e) = output::write_csv(&file5, &r5) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 5: Project Details\n");
    output::preview_table_rows(&r5, preview);
    println!("(Full table exported to {})\n", file5.display());

    let recent: Vec<ProjectRecord> = reports::recent_projects(&projects, 3).into_iter().cloned().collect();
    println!("Recently Added Projects\n");
    output::preview_table_rows(&recent, 3);

    let summary = reports::generate_summary(&projects, &kpi_projects, &costs);
    if let Err(e) = output::write_json(&out.join("summary.json"), &summary) {
        eprintln!("Write error: {}", e);
    }
    let k = &summary.projects;
    println!("Summary Stats (summary.json):");
    println!(
        "Projects: {} | Order: {} | Sales: {} | Cost: {} | Collection: {} | Profit: {}",
        util::format_int(k.project_count),
        util::format_money(k.order),
        util::format_money(k.sales),
        util::format_money(k.cost),
        util::format_money(k.collection),
        util::format_money(k.profit)
    );
    println!("Profit Ratio: {}\n", util::format_ratio(k.profit_ratio));
}

/// Option [3]: forget the cached workbook and load it again.
fn handle_refresh(app: &mut App) {
    app.data.invalidate();
    handle_load(app);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config_arg = std::env::args().nth(1);
    let config = match ReportConfig::resolve(config_arg.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to read configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut data = LoadCache::new();
    data.on_invalidate(|| info!("workbook cache cleared"));
    let mut app = App { config, data };

    loop {
        println!("Project Finance Reports:");
        println!("[1] Load the workbook");
        println!("[2] Generate Reports");
        println!("[3] Refresh data");
        println!("[4] Exit\n");
        match read_choice().as_str() {
            "1" => handle_load(&mut app),
            "2" => {
                println!();
                handle_generate_reports(&app);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => handle_refresh(&mut app),
            "4" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 1, 2, 3 or 4.\n"),
        }
    }
}
