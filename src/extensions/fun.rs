//! Small random commands

use rand::seq::SliceRandom;
use rand::Rng;

use super::trait_def::Extension;
use crate::application::errors::{CommandError, ExtensionError};
use crate::domain::entities::{Command, Embed, Param, Response};

pub struct Fun;

impl Extension for Fun {
    fn name(&self) -> &str {
        "fun"
    }

    fn description(&self) -> &str {
        "Coin flips and random picks"
    }

    fn commands(&self) -> Result<Vec<Command>, ExtensionError> {
        Ok(vec![coinflip(), choose()])
    }
}

pub fn create() -> Box<dyn Extension> {
    Box::new(Fun)
}

fn coinflip() -> Command {
    Command::new("coinflip")
        .with_description("Flip a coin.")
        .with_aliases(vec!["flip".to_string()])
        .with_handler(|_| {
            let side = if rand::thread_rng().gen_bool(0.5) { "heads" } else { "tails" };
            Ok(Response::embed(Embed::new(format!("The coin landed on **{}**.", side))))
        })
}

fn choose() -> Command {
    Command::new("choose")
        .with_description("Pick one of the given options. Quote options that contain spaces.")
        .with_param(Param::required("options"))
        .with_handler(|ctx| {
            if ctx.args.len() < 2 {
                return Err(CommandError::BadArgument(
                    "Give me at least two options to choose from.".to_string(),
                ));
            }
            let pick = ctx
                .args
                .choose(&mut rand::thread_rng())
                .cloned()
                .unwrap_or_default();
            Ok(Response::embed(Embed::new(format!("I choose **{}**.", pick))))
        })
}
