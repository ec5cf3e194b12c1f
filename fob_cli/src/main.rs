//! # FOB Costing CLI
//!
//! Terminal front end for the costing engine. Prompts for a cost sheet,
//! prints the breakdown, and saves it to the local history.
//!
//! ```text
//! fob calc [tshirt|shirt|jeans]   prompt for inputs, compute, save
//! fob calc-json <file>            compute a CostInput JSON file, save
//! fob history                     list saved cost sheets, newest first
//! fob show <id>                   print one saved cost sheet as JSON
//! ```

mod config;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use fob_core::calculations::{CommonInputs, JeansInput, PieceCosts, ShirtInput, TShirtInput};
use fob_core::{
    compute, BlobStore, CostBreakdown, CostError, CostInput, CostResult, FileBlobStore, GarmentType,
    HistoryStore,
};
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Calc(GarmentType),
    CalcJson(PathBuf),
    History,
    Show(String),
    Help,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut args = args.iter().map(String::as_str);
    match args.next() {
        None | Some("calc") => Ok(Command::Calc(GarmentType::from_tag(args.next()))),
        Some("calc-json") => args
            .next()
            .map(|path| Command::CalcJson(PathBuf::from(path)))
            .ok_or_else(|| "calc-json needs a file path".to_string()),
        Some("history") => Ok(Command::History),
        Some("show") => args
            .next()
            .map(|id| Command::Show(id.to_string()))
            .ok_or_else(|| "show needs a cost sheet id".to_string()),
        Some("help") | Some("-h") | Some("--help") => Ok(Command::Help),
        Some(other) => Err(format!("Unknown command: {}", other)),
    }
}

fn print_usage() {
    println!("Usage:");
    println!("  fob calc [tshirt|shirt|jeans]   prompt for inputs, compute, save");
    println!("  fob calc-json <file>            compute a cost input JSON file, save");
    println!("  fob history                     list saved cost sheets");
    println!("  fob show <id>                   print a saved cost sheet");
}

/// Empty input takes the default; anything else must be a finite number.
fn parse_f64_or_default(input: &str, default: f64) -> Result<f64, String> {
    let text = input.trim();
    if text.is_empty() {
        return Ok(default);
    }

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(format!("'{}' is not a number", text)),
    }
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    loop {
        print!("{} [{}]: ", prompt, default);
        if io::stdout().flush().is_err() {
            return default;
        }

        let mut input = String::new();
        match io::stdin().lock().read_line(&mut input) {
            // End of input: nothing left to re-prompt with
            Ok(0) | Err(_) => return default,
            Ok(_) => {}
        }

        match parse_f64_or_default(&input, default) {
            Ok(value) => return value,
            Err(message) => eprintln!("  {}, try again", message),
        }
    }
}

fn prompt_text(prompt: &str, default: &str) -> String {
    print!("{} [{}]: ", prompt, default);
    if io::stdout().flush().is_err() {
        return default.to_string();
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default.to_string();
    }

    match input.trim() {
        "" => default.to_string(),
        text => text.to_string(),
    }
}

fn prompt_common(style: &str, buyer: &str, season: &str, piece_costs: PieceCosts) -> CommonInputs {
    println!("Style Info");
    let style_name = prompt_text("  Style name", style);
    let buyer_name = prompt_text("  Buyer name", buyer);
    let season = prompt_text("  Season", season);

    println!("Other Costs (USD per pc)");
    let piece_costs = PieceCosts {
        aop_print_cost_per_pc: prompt_f64("  AOP print", piece_costs.aop_print_cost_per_pc),
        accessories_cost_per_pc: prompt_f64("  Accessories", piece_costs.accessories_cost_per_pc),
        cm_cost_per_pc: prompt_f64("  CM", piece_costs.cm_cost_per_pc),
        washing_cost_per_pc: prompt_f64("  Washing", piece_costs.washing_cost_per_pc),
        commercial_cost_per_pc: prompt_f64("  Commercial", piece_costs.commercial_cost_per_pc),
        testing_cost_per_pc: prompt_f64("  Testing", piece_costs.testing_cost_per_pc),
    };

    CommonInputs {
        style_name,
        buyer_name,
        season,
        profit_margin_percent: prompt_f64("Profit margin %", 15.0),
        piece_costs,
    }
}

fn prompt_input(garment: GarmentType) -> CostInput {
    match garment {
        GarmentType::TShirt => {
            let common = prompt_common(
                "Style-001",
                "Buyer-A",
                "Summer 24",
                PieceCosts {
                    accessories_cost_per_pc: 0.17,
                    cm_cost_per_pc: 1.0,
                    ..PieceCosts::default()
                },
            );
            println!("Fabric Parameters");
            CostInput::TShirt(TShirtInput {
                common,
                fabric_type: Some(prompt_text("  Fabric type", "Single Jersey")),
                gsm: prompt_f64("  GSM", 160.0),
                body_length: prompt_f64("  Body length (cm)", 70.0),
                sleeve_length: prompt_f64("  Sleeve length (cm)", 22.0),
                chest_width: prompt_f64("  Chest (cm)", 52.0),
                fabric_allowance: prompt_f64("  Allowance (cm)", 4.0),
                wastage_percent: prompt_f64("  Wastage %", 10.0),
                yarn_price_per_kg: prompt_f64("  Yarn $/kg", 4.5),
                knitting_charge_per_kg: prompt_f64("  Knit $/kg", 0.5),
                dyeing_charge_per_kg: prompt_f64("  Dye $/kg", 1.2),
            })
        }
        GarmentType::Shirt => {
            let common = prompt_common(
                "Shirt-001",
                "Buyer-A",
                "Summer 24",
                PieceCosts {
                    accessories_cost_per_pc: 0.35,
                    cm_cost_per_pc: 1.8,
                    ..PieceCosts::default()
                },
            );
            println!("Fabric Parameters (inches)");
            CostInput::Shirt(ShirtInput {
                common,
                shirt_body_length: prompt_f64("  Body length", 30.0),
                shirt_sleeve_length: prompt_f64("  Sleeve length", 25.0),
                shirt_chest_width: prompt_f64("  Chest width", 22.0),
                shirt_collar: prompt_f64("  Collar", 15.5),
                fabric_width: prompt_f64("  Fabric width", 58.0),
                shirt_fabric_allowance: prompt_f64("  Allowance", 2.0),
                shirt_wastage_percent: prompt_f64("  Wastage %", 5.0),
                fabric_price_per_yard: prompt_f64("  Fabric $/yd", 3.5),
            })
        }
        GarmentType::Jeans => {
            let common = prompt_common(
                "Denim-001",
                "Buyer-A",
                "Fall 24",
                PieceCosts {
                    accessories_cost_per_pc: 0.6,
                    cm_cost_per_pc: 2.5,
                    washing_cost_per_pc: 1.2,
                    ..PieceCosts::default()
                },
            );
            println!("Fabric Parameters (inches)");
            CostInput::Jeans(JeansInput {
                common,
                waist: prompt_f64("  Waist", 32.0),
                inseam: prompt_f64("  Inseam", 32.0),
                thigh_width: prompt_f64("  Thigh width", 12.0),
                front_rise: prompt_f64("  Front rise", 11.0),
                back_rise: prompt_f64("  Back rise", 15.0),
                leg_opening: prompt_f64("  Leg opening", 7.5),
                denim_fabric_width: prompt_f64("  Denim width", 58.0),
                jeans_fabric_allowance: prompt_f64("  Allowance", 2.0),
                jeans_wastage_percent: prompt_f64("  Wastage %", 8.0),
                fabric_price_per_yard: prompt_f64("  Denim $/yd", 4.0),
            })
        }
    }
}

fn print_breakdown(input: &CostInput, breakdown: &CostBreakdown) {
    let common = input.common();

    println!("═══════════════════════════════════════");
    println!("  COST BREAKDOWN - {}", breakdown.garment_label());
    println!("═══════════════════════════════════════");
    println!();
    println!("Style:  {} ({}, {})", common.style_name, common.buyer_name, common.season);
    println!();

    match breakdown {
        CostBreakdown::Knit(b) => {
            println!("Consumption:");
            println!("  Length x Width:   {:.1} x {:.1} cm", b.length_cm, b.width_cm);
            println!("  Basic:            {:.4} kg/doz", b.basic_consumption_kg_doz);
            println!("  With wastage:     {:.4} kg/doz", b.total_fabric_req_kg_doz);
            println!();
            println!("Fabric:");
            println!("  Rate:             $ {:.2}/kg", b.fabric_rate_per_kg);
            println!("  Cost:             $ {:.2}/doz", b.fabric_cost_per_doz);
            println!("  Cost:             $ {:.2}/pc", b.fabric_cost_per_pc);
        }
        CostBreakdown::Woven(b) => {
            println!("Consumption:");
            println!("  Total length:     {:.2} in", b.total_length_in);
            if let Some(rise) = b.average_rise_in {
                println!("  Average rise:     {:.2} in", rise);
            }
            println!("  Per piece:        {:.3} yd", b.yards_per_piece);
            println!("  With wastage:     {:.3} yd", b.yards_with_wastage);
            println!("  Per dozen:        {:.2} yd", b.yards_per_doz);
            println!();
            println!("Fabric:");
            println!("  Cost:             $ {:.2}/pc", b.fabric_cost_per_pc);
        }
    }

    println!();
    println!("Totals:");
    println!("  Other costs:      $ {:.2}/pc", common.piece_costs.total());
    println!("  Total cost:       $ {:.2}/pc", breakdown.total_cost_per_pc());
    println!("  Margin:           {:.1} %", common.profit_margin_percent);
    println!();
    println!("═══════════════════════════════════════");
    println!("  FOB: $ {:.2}/pc", breakdown.final_fob_per_pc());
    println!("═══════════════════════════════════════");
}

fn calculate_and_save<S: BlobStore>(history: &HistoryStore<S>, input: CostInput) -> CostResult<()> {
    let breakdown = compute(&input)?;

    print_breakdown(&input, &breakdown);
    println!();
    println!("JSON Output:");
    println!("{}", serde_json::to_string_pretty(&breakdown)?);
    println!();

    // The breakdown is already on screen; a failed save only loses the history entry
    let record = history.append(input, breakdown)?;
    println!("Saved to history as {}", record.id);
    Ok(())
}

fn print_history<S: BlobStore>(history: &HistoryStore<S>) {
    let summaries = history.summaries();
    if summaries.is_empty() {
        println!("No calculations yet");
        println!("Create your first cost sheet with `fob calc`");
        return;
    }

    for summary in summaries {
        let fabric = match (&summary.fabric_type, summary.gsm) {
            (Some(fabric_type), Some(gsm)) => format!("  {} {} GSM", fabric_type, gsm),
            (None, Some(gsm)) => format!("  {} GSM", gsm),
            _ => String::new(),
        };
        println!(
            "{}  {}  {:<16} {:<12} {:<15} $ {:>6.2}/pc  {} {}{}",
            summary.id,
            summary.timestamp.format("%Y-%m-%d %H:%M"),
            summary.style_name,
            summary.buyer_name,
            summary.garment_type,
            summary.final_fob_per_pc,
            summary.consumption_per_doz,
            summary.consumption_unit,
            fabric,
        );
    }
}

fn execute<S: BlobStore>(command: Command, history: &HistoryStore<S>) -> CostResult<()> {
    match command {
        Command::Help => {
            print_usage();
            Ok(())
        }
        Command::Calc(garment) => {
            println!("FOB Costing - New {} Cost Sheet", garment);
            println!("(press Enter to accept the value in brackets)");
            println!();
            let input = prompt_input(garment);
            println!();
            calculate_and_save(history, input)
        }
        Command::CalcJson(path) => {
            let json = fs::read_to_string(&path).map_err(|e| {
                CostError::storage_error("read input", path.display().to_string(), e.to_string())
            })?;
            let input: CostInput = serde_json::from_str(&json)?;
            calculate_and_save(history, input)
        }
        Command::History => {
            print_history(history);
            Ok(())
        }
        Command::Show(id) => {
            let record = history.require(&id)?;
            print_breakdown(&record.inputs, &record.breakdown);
            println!();
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
    }
}

fn init_logging(config: &CliConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let config = CliConfig::from_env();
    init_logging(&config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{}", message);
            print_usage();
            return ExitCode::from(2);
        }
    };

    let history = HistoryStore::new(FileBlobStore::new(&config.data_dir));
    match execute(command, &history) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}
