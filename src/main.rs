use model::argparse::parse_args;
use model::observation::Settings;
use model::parameters::Parameters;
use model::{run, Simulation, Ticks};
use std::fs;

fn main() -> Result<(), String> {
    env_logger::init();

    let mut p = Parameters::default();
    let mut max_t: Ticks = 100_000;
    let mut parameter_file = String::new();
    let mut o = Settings {
        log_every: 1,
        regions_every: 0,
    };

    {
        let parser = parse_args(&mut p, &mut max_t, &mut parameter_file, &mut o);
        parser.parse_args_or_exit();
    }
    if !parameter_file.is_empty() {
        // Values given on the command line win over the file, so parse them
        // again on top of what the file specifies.
        let contents = fs::read_to_string(&parameter_file).map_err(|e| e.to_string())?;
        p = Parameters::from_json(&contents).map_err(|e| e.to_string())?;
        let parser = parse_args(&mut p, &mut max_t, &mut parameter_file, &mut o);
        parser.parse_args_or_exit();
    }

    let mut s = Simulation::new(p).map_err(|e| e.to_string())?;
    if let Some(p) = s.parameters() {
        println!(
            "PARAMETERS: {:}",
            serde_json::to_string(p).map_err(|e| e.to_string())?
        );
    }

    run(&mut s, max_t, &o).map_err(|e| e.to_string())
}
