use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use block_forge::{
    dsl::BlockSetDsl,
    linker::{
        self, Container,
        report::{MergedInterfaceReport, ensure_outputs_bound},
    },
};

#[derive(Debug, Default, Clone)]
struct Cli {
    blocks: Option<PathBuf>,
    json: bool,
    check: bool,
}

fn parse_cli(args: &[String]) -> Result<Cli> {
    let mut cli = Cli::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--blocks" => {
                let Some(v) = args.get(i + 1) else {
                    return Err(anyhow!("missing value for --blocks"));
                };
                cli.blocks = Some(PathBuf::from(v));
                i += 2;
            }
            "--json" => {
                cli.json = true;
                i += 1;
            }
            "--check" => {
                cli.check = true;
                i += 1;
            }
            other => {
                return Err(anyhow!(
                    "unknown argument: {other} (supported: --blocks <blocks.json>, --json, --check)"
                ));
            }
        }
    }
    Ok(cli)
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_cli(&args)?;
    let Some(path) = cli.blocks else {
        return Err(anyhow!("missing --blocks <blocks.json>"));
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    let set: BlockSetDsl =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;

    let mut container = Container::new();
    let linked = linker::link_block_set(&mut container, &set)?;
    let report = MergedInterfaceReport::build(&container, &linked.merged);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if cli.check {
        ensure_outputs_bound(&container, &linked.merged)?;
    }
    Ok(())
}

fn print_report(report: &MergedInterfaceReport) {
    println!("block {}", report.block);
    println!("inputs:");
    for field in &report.inputs {
        let mut line = format!("  {}: {}", field.name, field.value_type.name());
        if field.property {
            line.push_str(" [property]");
        }
        if !field.aliases.is_empty() {
            line.push_str(&format!(" (aka {})", field.aliases.join(", ")));
        }
        if !field.used {
            line.push_str(" (unused)");
        }
        println!("{line}");
    }
    println!("outputs:");
    for field in &report.outputs {
        let mut line = format!("  {}: {}", field.name, field.value_type.name());
        match &field.source {
            Some(source) => line.push_str(&format!(" <- {source}")),
            None => line.push_str(" (unbound)"),
        }
        if !field.aliases.is_empty() {
            line.push_str(&format!(" (aka {})", field.aliases.join(", ")));
        }
        println!("{line}");
    }
}
