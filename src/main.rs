use anyhow::Result;

use fivex_gcode::config::{Command, Config};
use fivex_gcode::{parse_file, to_gcode, ParseResult, Projector};

fn main() -> Result<()> {
    // Parse configuration from command line and user config
    let config = Config::from_args_and_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    let result = parse_file(&config.gcode_file, &config.printer, None)?;

    match config.command {
        Command::Summary => print_summary(&result),
        Command::Json { pretty } => {
            let json = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{}", json);
        }
        Command::Reduce => print!("{}", to_gcode(&result)),
        Command::Transforms { active } => print_transforms(&result, active)?,
    }

    Ok(())
}

fn print_summary(result: &ParseResult) {
    println!("layers:    {}", result.layers().len());
    println!("paths:     {}", result.path_count());
    println!("points:    {}", result.point_count());
    println!("rotations: {}", result.rotations().len());
    for (i, rotation) in result.rotations().iter().enumerate() {
        println!(
            "  [{}] incline {:.3}, bed {:.3}",
            i, rotation.x_rot, rotation.z_rot
        );
    }

    let telemetry = result.telemetry();
    match telemetry.print_time {
        Some(seconds) => println!("print time:  {:.0} s", seconds),
        None => println!("print time:  unknown"),
    }
    match telemetry.consumption {
        Some(mm) => println!("consumption: {:.1} mm", mm),
        None => println!("consumption: unknown"),
    }

    if let Some(bounds) = result.bounds() {
        println!(
            "bounds: [{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}]",
            bounds.min[0], bounds.min[1], bounds.min[2], bounds.max[0], bounds.max[1], bounds.max[2]
        );
    }
}

fn print_transforms(result: &ParseResult, active: Option<usize>) -> Result<()> {
    let active = active.unwrap_or_else(|| result.final_rotation_index());
    let projector = Projector::new(result);

    for (i, layer) in result.layers().iter().enumerate() {
        let m = projector.layer_matrix(i, active)?;
        println!(
            "layer {} (LAYER:{}) rotation {} -> {}",
            i,
            layer.number(),
            result.lays2rots()[i],
            active
        );
        for row in m.row_iter() {
            println!(
                "  {:>10.6} {:>10.6} {:>10.6} {:>10.6}",
                row[0], row[1], row[2], row[3]
            );
        }
    }

    Ok(())
}
