use crate::cli::parser::{
    GlobalArgs, HostArgs, HostCommands, HostCreateArgs, HostRemoveArgs, HostUpdateArgs,
};
use crate::config::Config;
use crate::core::api::{with_session, ProxyHostApi};
use crate::core::credentials::{read_info_file, Credentials};
use crate::core::workflow::{self, BulkUpdateRequest, CreateRequest, RemoveOutcome};
use crate::utils::{NpmError, Result};
use std::path::Path;

pub fn execute(config: Config, global: &GlobalArgs, args: HostArgs) -> Result<()> {
    let credentials = resolve_credentials(global, &config)?;

    with_session(&credentials, &config.server, |session| {
        run(session, &config, args.command)
    })
}

/// Run a host command against an open session.
pub fn run<A: ProxyHostApi + ?Sized>(api: &A, config: &Config, command: HostCommands) -> Result<()> {
    match command {
        HostCommands::Create(args) => execute_create(api, config, args),
        HostCommands::Remove(args) => execute_remove(api, args),
        HostCommands::Update(args) => execute_update(api, config, args),
    }
}

fn execute_create<A: ProxyHostApi + ?Sized>(api: &A, config: &Config, args: HostCreateArgs) -> Result<()> {
    let request = CreateRequest {
        template: args
            .template
            .clone()
            .unwrap_or_else(|| config.templates.create.clone()),
        domains: args.domain_names(),
        forward_host: args.forward_host.clone(),
        forward_port: args.forward_port,
        check_conflicts: !args.no_conflict_check,
    };

    workflow::create_host(api, &request)?;
    println!("Success");
    Ok(())
}

fn execute_remove<A: ProxyHostApi + ?Sized>(api: &A, args: HostRemoveArgs) -> Result<()> {
    match workflow::remove_domain(api, &args.domain)? {
        RemoveOutcome::Deleted { id, .. } => {
            tracing::info!(id, domain = %args.domain, "deleted host");
        }
        RemoveOutcome::Updated { id, remaining, .. } => {
            tracing::info!(id, domain = %args.domain, ?remaining, "removed domain from host");
        }
    }
    println!("Success");
    Ok(())
}

fn execute_update<A: ProxyHostApi + ?Sized>(api: &A, config: &Config, args: HostUpdateArgs) -> Result<()> {
    let request = BulkUpdateRequest {
        field: args.field,
        update_template: args
            .update_template
            .unwrap_or_else(|| config.templates.update.clone()),
        search_template: args
            .search_template
            .unwrap_or_else(|| config.templates.search.clone()),
        search_fields: if args.search_fields.is_empty() {
            config.templates.search_fields.clone()
        } else {
            args.search_fields
        },
    };

    let reports = workflow::bulk_update(api, &request)?;

    let mut failed = Vec::new();
    for report in &reports {
        let domains = report.domains.join(", ");
        match &report.result {
            Ok(_) => println!("Updated host: [{}]", domains),
            Err(e) => {
                eprintln!("{}", e);
                println!("Failed to update host: [{}]", domains);
                failed.push(domains);
            }
        }
    }

    if reports.is_empty() {
        println!("No hosts matched the search template");
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(NpmError::invalid_args(format!(
            "{} of {} host updates failed",
            failed.len(),
            reports.len()
        )))
    }
}

/// Explicit `--host/--username/--password` flags win over any info file.
pub fn resolve_credentials(global: &GlobalArgs, config: &Config) -> Result<Credentials> {
    if global.host.is_some() || global.username.is_some() || global.password.is_some() {
        let host = required_option(&global.host, "--host")?;
        let username = required_option(&global.username, "--username")?;
        let password = required_option(&global.password, "--password")?;
        return Ok(Credentials::new(host, username, password, global.port));
    }

    let info_file = global
        .info_file
        .as_deref()
        .or_else(|| config.default_info_file().map(Path::new));

    match info_file {
        Some(path) => {
            let mut credentials = read_info_file(path)?;
            if global.port.is_some() {
                credentials.port = global.port;
            }
            Ok(credentials)
        }
        None => Err(NpmError::invalid_args(
            "no credentials given: pass --host, --username and --password or --info-file",
        )),
    }
}

fn required_option(value: &Option<String>, option: &str) -> Result<String> {
    value
        .clone()
        .ok_or_else(|| NpmError::invalid_args(format!("The option '{}' is undefined.", option)))
}
