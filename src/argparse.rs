use crate::observation::Settings;
use crate::{Parameters, Ticks};
use ::argparse::{ArgumentParser, Store, StoreOption};

pub fn parse_args<'a>(
    p: &'a mut Parameters,
    max_t: &'a mut Ticks,
    parameter_file: &'a mut String,
    observation: &'a mut Settings,
) -> ArgumentParser<'a> {
    let mut parser = ArgumentParser::new();
    parser.set_description("Run a simulation of Axelrod's model of cultural dissemination");
    parser.refer(parameter_file).add_option(
        &["--parameters"],
        Store,
        "JSON file to read parameters from. Other options override its values.",
    );
    parser.refer(&mut p.world_size).add_option(
        &["--world-size"],
        Store,
        "side length of the square grid, in agents",
    );
    parser.refer(&mut p.features).add_option(
        &["--features"],
        Store,
        "number of cultural features per agent",
    );
    parser.refer(&mut p.traits).add_option(
        &["--traits"],
        Store,
        "number of traits each feature can take",
    );
    parser.refer(&mut p.radius).add_option(
        &["--radius"],
        Store,
        "interaction radius, in grid cells",
    );
    parser.refer(&mut p.neighborhood).add_option(
        &["--neighborhood"],
        Store,
        "metric for the radius: euclidean, moore, or von-neumann",
    );
    parser.refer(&mut p.seed).add_option(
        &["--seed"],
        StoreOption,
        "seed for the random number generator (default: drawn at random)",
    );
    parser.refer(&mut observation.log_every).add_option(
        &["--log-every"],
        Store,
        "period of logging, in ticks (0: never)",
    );
    parser.refer(&mut observation.regions_every).add_option(
        &["--regions-every"],
        Store,
        "period of region analysis, in ticks (0: only at the end)",
    );
    parser.refer(max_t).add_option(
        &["--steps"],
        Store,
        "maximum number of ticks to simulate",
    );
    parser
}
