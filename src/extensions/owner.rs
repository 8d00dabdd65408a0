//! Commands only the bot owners may run

use super::trait_def::Extension;
use crate::application::errors::ExtensionError;
use crate::domain::entities::{Action, Command, Embed, Param, Response};

pub struct Owner;

impl Extension for Owner {
    fn name(&self) -> &str {
        "owner"
    }

    fn description(&self) -> &str {
        "Owner-only controls"
    }

    fn commands(&self) -> Result<Vec<Command>, ExtensionError> {
        Ok(vec![say(), embed(), shutdown()])
    }
}

pub fn create() -> Box<dyn Extension> {
    Box::new(Owner)
}

fn say() -> Command {
    Command::new("say")
        .with_description("The bot will say anything you want.")
        .with_param(Param::required("message"))
        .owner_only()
        .with_handler(|ctx| Ok(Response::text(ctx.rest(0).unwrap_or_default())))
}

fn embed() -> Command {
    Command::new("embed")
        .with_description("The bot will say anything you want, but within embeds.")
        .with_param(Param::required("message"))
        .owner_only()
        .with_handler(|ctx| Ok(Response::embed(Embed::new(ctx.rest(0).unwrap_or_default()))))
}

fn shutdown() -> Command {
    Command::new("shutdown")
        .with_description("Make the bot shutdown.")
        .owner_only()
        .with_handler(|_| {
            Ok(Response::embed(Embed::new("Shutting down. Bye! :wave:")).with_action(Action::Shutdown))
        })
}
