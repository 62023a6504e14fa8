//! Shell completion scripts
//!
//! The clap-generated script is extended so that `-d/--datasource` completes
//! the datasource names listed by `searchsh config --list-datasources`.

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::CliArgs;
use crate::error::{ConfigError, Result};

const BIN_NAME: &str = "searchsh";

/// Print the completion script for `shell_name` to stdout
pub fn generate_completion(shell_name: &str) -> Result<()> {
    print!("{}", render_completion(shell_name)?);
    Ok(())
}

/// Build the completion script for `shell_name`
pub fn render_completion(shell_name: &str) -> Result<String> {
    let shell = parse_shell(shell_name)?;

    let mut cmd = CliArgs::command();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buffer);
    let mut script = String::from_utf8_lossy(&buffer).into_owned();

    if let Some(extension) = datasource_extension(shell) {
        script.push('\n');
        script.push_str(extension);
    }
    Ok(script)
}

fn parse_shell(shell_name: &str) -> Result<Shell> {
    match shell_name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        "powershell" | "pwsh" => Ok(Shell::PowerShell),
        _ => Err(ConfigError::Generic(format!(
            "Unsupported shell: {}. Supported shells: bash, zsh, fish, powershell",
            shell_name
        ))
        .into()),
    }
}

/// Datasource name completion appended to the generated script
fn datasource_extension(shell: Shell) -> Option<&'static str> {
    match shell {
        Shell::Bash => Some(
            r#"_searchsh_with_datasources() {
    local cur prev
    cur="${COMP_WORDS[COMP_CWORD]}"
    prev="${COMP_WORDS[COMP_CWORD-1]}"
    if [[ "$prev" == "-d" || "$prev" == "--datasource" ]]; then
        COMPREPLY=($(compgen -W "$(searchsh config --list-datasources 2>/dev/null)" -- "$cur"))
        return 0
    fi
    _searchsh "$@"
}
complete -F _searchsh_with_datasources -o bashdefault -o default searchsh
"#,
        ),
        Shell::Zsh => Some(
            r#"_searchsh_with_datasources() {
    if [[ ${words[CURRENT-1]} == "-d" || ${words[CURRENT-1]} == "--datasource" ]]; then
        local -a datasources
        datasources=(${(f)"$(searchsh config --list-datasources 2>/dev/null)"})
        _describe 'datasources' datasources
        return 0
    fi
    _searchsh "$@"
}
compdef _searchsh_with_datasources searchsh
"#,
        ),
        Shell::Fish => Some(
            r#"complete -c searchsh -s d -l datasource -f -a "(searchsh config --list-datasources 2>/dev/null)" -d "Datasource name from config file"
"#,
        ),
        _ => None,
    }
}
