use rebar::prelude::*;
use std::fs::File;
use std::path::PathBuf;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "rebar_path",
    about = "Drives the reinforcing steel model through a strain path given in a JSON file"
)]
struct Options {
    /// JSON file with the parameters and the strains
    input: PathBuf,

    /// Output file (defaults to <input stem>_response.csv or .json next to the input)
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// Writes CSV instead of JSON
    #[structopt(long)]
    csv: bool,

    /// Also saves a stress-strain figure (requires Python and Matplotlib)
    #[structopt(long)]
    figure: Option<PathBuf>,
}

fn main() -> Result<(), RebarError> {
    env_logger::init();

    // parse options
    let options = Options::from_args();

    // run the simulation
    let input = PathInput::read_json(&options.input)?;
    log::info!("following {} strains", input.strains.len());
    let responses = input.run()?;

    // write the results
    let extension = if options.csv { "csv" } else { "json" };
    let output = match &options.output {
        Some(path) => path.clone(),
        None => {
            let stem = options.input.file_stem().unwrap_or_default().to_string_lossy();
            options.input.with_file_name(format!("{}_response.{}", stem, extension))
        }
    };
    if options.csv {
        write_responses_csv(&responses, &output)?;
    } else {
        let mut file = File::create(&output)?;
        serde_json::to_writer_pretty(&mut file, &responses)?;
    }

    // figure
    if let Some(path) = &options.figure {
        let mut plot = ResponsePlot::new();
        plot.draw(&responses, |curve| {
            curve.set_line_color("#1a5fb4");
        });
        plot.save(path, true)?;
    }

    // message
    let message = format!("results written to {}", output.display());
    let thin_line = format!("{:─^1$}", "", message.chars().count());
    println!("\n{}", thin_line);
    println!("{}", message);
    println!("{}\n", thin_line);
    Ok(())
}
