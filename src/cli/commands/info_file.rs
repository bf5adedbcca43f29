use crate::cli::parser::{CreateInfoFileArgs, GlobalArgs};
use crate::core::credentials::{write_info_file, Credentials};
use crate::utils::{NpmError, Result};
use dialoguer::Password;
use std::env;

fn is_non_interactive() -> bool {
    env::var("NPMCTL_NON_INTERACTIVE").is_ok()
        || env::var("CI").is_ok()
        || !atty::is(atty::Stream::Stdin)
}

pub fn execute(global: &GlobalArgs, args: CreateInfoFileArgs) -> Result<()> {
    let password = match args.npm_password {
        Some(password) => password,
        None => prompt_password()?,
    };

    let credentials = Credentials::new(args.npm_host, args.npm_username, password, global.port);
    write_info_file(&args.path, &credentials)?;

    println!("Success");
    Ok(())
}

fn prompt_password() -> Result<String> {
    if is_non_interactive() {
        return Err(NpmError::invalid_args(
            "password is required in non-interactive mode",
        ));
    }

    Password::new()
        .with_prompt("NPM password")
        .interact()
        .map_err(|e| NpmError::invalid_args(format!("Failed to read password: {e}")))
}
