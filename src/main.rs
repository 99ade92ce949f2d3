use clap::Parser;
use slab_cutter::config::SplitPolicy;
use slab_cutter::job::{Job, load_job, save_job};
use slab_cutter::render;
use slab_cutter::report::Report;
use slab_cutter::solver::Solver;
use slab_cutter::types::{PieceRequirement, trim_float};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "slab_cutter",
    about = "Stone slab cutting optimizer with edge trim and saw kerf"
)]
struct Cli {
    /// Load sheet settings and pieces from a saved job file
    #[arg(long)]
    job: Option<String>,

    /// Slab dimensions in inches (LxW, e.g. 130x65)
    #[arg(long, value_parser = parse_dimensions)]
    slab: Option<(f64, f64)>,

    /// Unusable border trimmed from every slab edge, in inches
    #[arg(long)]
    trim: Option<f64>,

    /// Saw kerf in inches
    #[arg(long)]
    kerf: Option<f64>,

    /// Cost per slab
    #[arg(long)]
    cost: Option<f64>,

    /// Pieces as ROOM:NAME:LxW[:QTY][:r][:s] (r = may rotate, s = center seam)
    #[arg(long = "piece", num_args = 1..)]
    pieces: Vec<String>,

    /// Free-space split policy: row-priority or shorter-axis
    #[arg(long)]
    split: Option<SplitPolicy>,

    /// Job name stored with --save
    #[arg(long)]
    name: Option<String>,

    /// Material stored with --save
    #[arg(long)]
    material: Option<String>,

    /// Write the resulting job to this file
    #[arg(long)]
    save: Option<String>,

    /// Show ASCII layout of each slab
    #[arg(long)]
    layout: bool,

    /// Log packing decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_dimensions(s: &str) -> Result<(f64, f64), String> {
    let (l, w) = s
        .split_once('x')
        .ok_or_else(|| format!("invalid dimensions '{}', expected LxW", s))?;
    let length = l
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid length in '{}'", s))?;
    let width = w
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    if !(length.is_finite() && width.is_finite()) {
        return Err(format!("dimensions must be finite in '{}'", s));
    }
    if length <= 0.0 || width <= 0.0 {
        return Err(format!("dimensions must be positive in '{}'", s));
    }
    Ok((length, width))
}

fn parse_piece(s: &str) -> Result<PieceRequirement, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() < 3 {
        return Err(format!(
            "invalid piece '{}', expected ROOM:NAME:LxW[:QTY][:r][:s]",
            s
        ));
    }
    let (length, width) = parse_dimensions(parts[2])?;
    let mut req = PieceRequirement::new(parts[0].trim(), parts[1].trim(), length, width, 1);
    for flag in &parts[3..] {
        match *flag {
            "r" => req.allow_rotation = true,
            "s" => req.center_seam = true,
            qty => {
                req.quantity = qty
                    .parse::<u32>()
                    .map_err(|_| format!("invalid quantity or flag '{}' in '{}'", qty, s))?;
                if req.quantity == 0 {
                    return Err(format!("quantity must be non-zero in '{}'", s));
                }
            }
        }
    }
    Ok(req)
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let mut job = match &cli.job {
        Some(path) => load_job(path).unwrap_or_else(|e| fail(e)),
        None => Job::default(),
    };

    if let Some((length, width)) = cli.slab {
        job.sheet_length = length;
        job.sheet_width = width;
    }
    if let Some(trim) = cli.trim {
        job.trim = trim;
    }
    if let Some(kerf) = cli.kerf {
        job.kerf = kerf;
    }
    if let Some(cost) = cli.cost {
        job.cost = cost;
    }
    if let Some(split) = cli.split {
        job.settings.split = split;
    }
    if let Some(name) = cli.name {
        job.job_name = name;
    }
    if let Some(material) = cli.material {
        job.material = material;
    }

    let extra: Vec<PieceRequirement> = cli
        .pieces
        .iter()
        .map(|p| parse_piece(p))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| fail(e));
    job.pieces.extend(extra);

    if let Some(path) = &cli.save {
        save_job(path, &job).unwrap_or_else(|e| fail(e));
        println!("Saved job to {}", path);
    }

    if job.pieces.is_empty() {
        fail("no pieces given; use --piece or --job");
    }

    let sheet = job.sheet();
    let solver = Solver::new(sheet, job.settings, job.pieces.clone());
    let solution = solver.solve().unwrap_or_else(|e| fail(e));
    let report = Report::new(&solution);

    if !job.job_name.is_empty() {
        println!("Job: {}  Material: {}\n", job.job_name, job.material);
    }

    for (i, s) in solution.sheets.iter().enumerate() {
        println!("Slab #{}:", i + 1);
        for p in &s.placements {
            let rot = if p.rotated { " [rotated]" } else { "" };
            println!(
                "  {:<32} {} @ ({}, {}){}",
                p.id.to_string(),
                p.rect.inset(sheet.kerf),
                trim_float(p.x + sheet.edge_trim + sheet.kerf),
                trim_float(p.y + sheet.edge_trim + sheet.kerf),
                rot
            );
        }
        if cli.layout {
            print!(
                "{}",
                render::render_sheet(sheet.usable(), &s.placements, sheet.kerf)
            );
        }
        println!();
    }

    println!("Room breakdown:");
    for (room, sq_ft) in &report.rooms {
        println!("  {:<20} {:.2} sq ft", room, sq_ft);
    }
    println!();

    println!(
        "Summary: {} slab{} needed (${:.2}), {:.2} sq ft finished, {:.1}% waste",
        report.sheet_count,
        if report.sheet_count == 1 { "" } else { "s" },
        report.total_cost,
        report.finished_sq_ft,
        report.waste_percent,
    );
}
