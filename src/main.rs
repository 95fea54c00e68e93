use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::debug;
use tokio::io::{AsyncBufReadExt, BufReader};

use recipe_finder::config::load_config;
use recipe_finder::{render_slot, AppError, Controller, MealDbClient, Recipe, RecipeView};

#[derive(Parser, Debug)]
#[command(name = "recipe-finder", version, about = "Find recipes on TheMealDB")]
struct Cli {
    /// Override the API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print the recipe as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a random recipe
    Random,
    /// Show a recipe starting with the first letter of QUERY
    Search { query: String },
    /// Interactive search session
    Shell {
        /// Hide the shown recipe while the query does not match its name
        #[arg(long)]
        live_filter: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut config = load_config()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Command::Shell { live_filter: true } = cli.command {
        config.live_filter = true;
    }
    debug!("{:?}", config);

    let client = MealDbClient::from_config(&config)?;
    let mut controller = Controller::from_config(Arc::new(client), &config);

    match cli.command {
        Command::Random => {
            controller.request_random();
            controller.settle().await;
            print_recipe(controller.state().recipe(), cli.json)?;
        }
        Command::Search { query } => {
            controller.edit_query(query);
            controller.submit_search();
            controller.settle().await;
            print_recipe(controller.state().recipe(), cli.json)?;
        }
        Command::Shell { .. } => shell(controller, cli.json).await?,
    }

    Ok(())
}

fn print_recipe(recipe: Option<&Recipe>, json: bool) -> Result<(), AppError> {
    if json {
        if let Some(recipe) = recipe {
            println!("{}", serde_json::to_string_pretty(recipe)?);
        }
    } else {
        print!("{}", render_slot(recipe));
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    Search(Option<String>),
    Random,
    Query(String),
    Jump,
    Show,
    Help,
    Quit,
    Nothing,
    /// A command that takes no arguments was given some
    UnexpectedArgs(String),
}

impl ShellCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "" => ShellCommand::Nothing,
            "search" if rest.is_empty() => ShellCommand::Search(None),
            "search" => ShellCommand::Search(Some(rest.to_string())),
            "query" => ShellCommand::Query(rest.to_string()),
            "random" | "jump" | "show" | "help" | "quit" | "exit" if !rest.is_empty() => {
                ShellCommand::UnexpectedArgs(word.to_string())
            }
            "random" => ShellCommand::Random,
            "jump" => ShellCommand::Jump,
            "show" => ShellCommand::Show,
            "help" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            _ => ShellCommand::Query(line.to_string()),
        }
    }
}

const SHELL_HELP: &str = "\
Commands:
  search [text]  search by the first letter of the query (or of text)
  random         fetch a random recipe
  query <text>   set the query without searching (a bare line does the same)
  jump           show the ingredients section
  show           show the current recipe
  quit           leave";

async fn shell(mut controller: Controller, json: bool) -> Result<(), AppError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{SHELL_HELP}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match ShellCommand::parse(&line) {
                    ShellCommand::Search(text) => {
                        if let Some(text) = text {
                            controller.edit_query(text);
                        }
                        controller.submit_search();
                    }
                    ShellCommand::Random => controller.request_random(),
                    ShellCommand::Query(text) => {
                        controller.edit_query(text);
                        if controller.state().live_filter() {
                            print_recipe(controller.state().recipe(), json)?;
                        }
                    }
                    ShellCommand::Jump => {
                        if let Some(recipe) = controller.state().recipe() {
                            for line in RecipeView::new(recipe).jump_to_ingredients() {
                                println!("{line}");
                            }
                        }
                    }
                    ShellCommand::Show => print_recipe(controller.state().recipe(), json)?,
                    ShellCommand::Help => println!("{SHELL_HELP}"),
                    ShellCommand::Quit => break,
                    ShellCommand::Nothing => {}
                    ShellCommand::UnexpectedArgs(command) => {
                        println!("`{command}` takes no arguments");
                    }
                }
            }
            Some(completion) = controller.next_completion() => {
                if controller.apply(completion) {
                    print_recipe(controller.state().recipe(), json)?;
                }
            }
        }
    }

    Ok(())
}
