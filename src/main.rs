use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, Read};
use stencil_lang::cli::{self, CliError, RenderOptions};

#[derive(ClapParser)]
#[command(name = "stencil")]
#[command(about = "Stencil - a directive template language for plain text documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template against JSON data
    Render {
        /// The template text, or a path when --file is set
        template: String,

        /// JSON data (reads from stdin if not provided)
        #[arg(short, long)]
        data: Option<String>,

        /// Treat the template argument as a file path
        #[arg(short, long)]
        file: bool,
    },

    /// Check a template for syntax errors
    Check {
        /// The template text, or a path when --file is set
        template: String,

        /// Treat the template argument as a file path
        #[arg(short, long)]
        file: bool,
    },

    /// Print the token stream of a template
    Tokens {
        /// The template text, or a path when --file is set
        template: String,

        /// Treat the template argument as a file path
        #[arg(short, long)]
        file: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            template,
            data,
            file,
        } => run_render(template, data, file),
        Commands::Check { template, file } => run_check(template, file),
        Commands::Tokens { template, file } => run_tokens(template, file),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn load_template(template: String, file: bool) -> Result<String, CliError> {
    if file {
        std::fs::read_to_string(&template).map_err(CliError::Io)
    } else {
        Ok(template)
    }
}

fn run_render(template: String, data: Option<String>, file: bool) -> Result<(), CliError> {
    let template = load_template(template, file)?;

    let data = match data {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(CliError::Io)?;
            Some(buffer)
        }
        None => None,
    };

    let options = RenderOptions { template, data };
    let output = cli::execute_render(&options)?;

    // Rendered text is written exactly; the template decides its own
    // trailing newline.
    print!("{}", output);
    Ok(())
}

fn run_check(template: String, file: bool) -> Result<(), CliError> {
    let template = load_template(template, file)?;
    cli::execute_check(&template)?;
    println!("Template syntax is valid");
    Ok(())
}

fn run_tokens(template: String, file: bool) -> Result<(), CliError> {
    let template = load_template(template, file)?;
    for token in cli::execute_tokens(&template)? {
        println!("{:?}", token);
    }
    Ok(())
}
