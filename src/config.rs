use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigWarning, Error, Result};
use crate::registry::{ServerRecord, DEFAULT_PORT};

pub const CONFIG_FILE_NAME: &str = ".sshift-config";

const DEFAULT_SECTION: &str = "DEFAULT";

const KEY_NAME: &str = "HostName";
const KEY_HOST: &str = "Host";
const KEY_USER: &str = "User";
const KEY_PORT: &str = "Port";

/// Written on first run. Comment lines only, so it loads as an empty list.
pub const TEMPLATE: &str = "\
# sshift server list
#
# Every [section] below describes one SSH server. Servers are listed in the
# order they appear in this file. Lines starting with # or ; are comments.
#
# [section-identifier]
# HostName = <display name>   (optional, defaults to the section identifier)
# Host = <address>            (required)
# User = <login>              (required)
# Port = <port>               (optional, defaults to 22)
#
# Keys placed under [DEFAULT] apply to every server that does not set them.
#
# Example:
#
# [web]
# HostName = Web server
# Host = 192.168.0.10
# User = admin
# Port = 2222
";

/// Result of reading the config file once at startup.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub servers: Vec<ServerRecord>,
    pub warnings: Vec<ConfigWarning>,
    /// Set when the file did not exist and the template was written.
    pub created_template: bool,
}

/// `~/.sshift-config`.
///
/// # Errors
///
/// Returns [`Error::NoHomeDir`] if the home directory cannot be determined.
pub fn default_config_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILE_NAME))
        .ok_or(Error::NoHomeDir)
}

/// Load servers from `path`, writing the template first if the file is absent.
///
/// Each `[section]` is one server. A broken section is skipped and reported
/// in [`LoadOutcome::warnings`]; the rest of the file still loads.
pub fn load(path: &Path) -> LoadOutcome {
    // symlink_metadata so a dangling link is not taken for a first run
    let missing = match fs::symlink_metadata(path) {
        Ok(_) => false,
        Err(e) if e.kind() == ErrorKind::NotFound => true,
        Err(e) => {
            let warning = ConfigWarning::Unreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            };
            warn!("{}", warning);
            return LoadOutcome {
                warnings: vec![warning],
                ..LoadOutcome::default()
            };
        }
    };

    if missing {
        let mut outcome = LoadOutcome::default();
        match write_template(path) {
            Ok(()) => {
                info!("created config template at {}", path.display());
                outcome.created_template = true;
            }
            Err(e) => {
                let warning = ConfigWarning::TemplateNotWritten {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                };
                warn!("{}", warning);
                outcome.warnings.push(warning);
            }
        }
        return outcome;
    }

    let outcome = match fs::read_to_string(path) {
        Ok(contents) => parse(&contents),
        Err(e) => LoadOutcome {
            warnings: vec![ConfigWarning::Unreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }],
            ..LoadOutcome::default()
        },
    };

    for warning in &outcome.warnings {
        warn!("{}", warning);
    }
    info!(
        "loaded {} server(s) from {}",
        outcome.servers.len(),
        path.display()
    );
    outcome
}

fn write_template(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, TEMPLATE)
}

/// Parse config file contents into servers and warnings.
pub fn parse(contents: &str) -> LoadOutcome {
    let (sections, defaults, mut warnings) = parse_sections(contents);

    let mut servers = Vec::with_capacity(sections.len());
    for section in &sections {
        match build_record(section, &defaults) {
            Ok(record) => {
                debug!("section [{}] -> {}", section.name, record.target());
                servers.push(record);
            }
            Err(warning) => warnings.push(warning),
        }
    }

    LoadOutcome {
        servers,
        warnings,
        created_template: false,
    }
}

#[derive(Debug)]
struct Section {
    name: String,
    // keys are lowercased
    entries: HashMap<String, String>,
}

enum Target {
    // no header seen yet
    None,
    Defaults,
    Section(usize),
    // body of a duplicate section
    Skipped,
}

fn parse_sections(
    contents: &str,
) -> (Vec<Section>, HashMap<String, String>, Vec<ConfigWarning>) {
    let mut sections: Vec<Section> = Vec::new();
    let mut defaults = HashMap::new();
    let mut warnings = Vec::new();
    let mut target = Target::None;

    for (i, raw) in contents.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = section_header(line) {
            target = if name == DEFAULT_SECTION {
                Target::Defaults
            } else if sections.iter().any(|s| s.name == name) {
                warnings.push(ConfigWarning::DuplicateSection {
                    section: name.to_string(),
                    line: line_no,
                });
                Target::Skipped
            } else {
                sections.push(Section {
                    name: name.to_string(),
                    entries: HashMap::new(),
                });
                Target::Section(sections.len() - 1)
            };
            continue;
        }

        match (split_entry(line), &target) {
            (Some(_), Target::Skipped) => {}
            (Some((key, value)), Target::Defaults) => {
                defaults.insert(key, value);
            }
            (Some((key, value)), Target::Section(idx)) => {
                sections[*idx].entries.insert(key, value);
            }
            _ => warnings.push(ConfigWarning::MalformedLine {
                line: line_no,
                content: line.to_string(),
            }),
        }
    }

    (sections, defaults, warnings)
}

fn section_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')?
        .strip_suffix(']')
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

// `key = value` or `key: value`, split on whichever comes first
fn split_entry(line: &str) -> Option<(String, String)> {
    let idx = line.find(|c: char| c == '=' || c == ':')?;
    let key = line[..idx].trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_lowercase(), line[idx + 1..].trim().to_string()))
}

fn build_record(
    section: &Section,
    defaults: &HashMap<String, String>,
) -> std::result::Result<ServerRecord, ConfigWarning> {
    let lookup = |key: &str| {
        let key = key.to_lowercase();
        section
            .entries
            .get(&key)
            .or_else(|| defaults.get(&key))
            .filter(|value| !value.is_empty())
            .cloned()
    };
    let require = |key: &'static str| {
        lookup(key).ok_or_else(|| ConfigWarning::MissingKey {
            section: section.name.clone(),
            key,
        })
    };

    let host = require(KEY_HOST)?;
    let username = require(KEY_USER)?;
    // ssh would parse these as options
    for (key, value) in [(KEY_HOST, &host), (KEY_USER, &username)] {
        if value.starts_with('-') {
            return Err(ConfigWarning::OptionLikeValue {
                section: section.name.clone(),
                key,
                value: value.clone(),
            });
        }
    }
    let port = lookup(KEY_PORT).unwrap_or_else(|| DEFAULT_PORT.to_string());
    if !matches!(port.parse::<u16>(), Ok(p) if p != 0) {
        return Err(ConfigWarning::InvalidPort {
            section: section.name.clone(),
            value: port,
        });
    }

    Ok(ServerRecord {
        name: lookup(KEY_NAME).unwrap_or_else(|| section.name.clone()),
        host,
        username,
        port,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, host: &str, username: &str, port: &str) -> ServerRecord {
        ServerRecord {
            name: name.to_string(),
            host: host.to_string(),
            username: username.to_string(),
            port: port.to_string(),
        }
    }

    #[test]
    fn test_parse_two_sections_in_file_order() {
        let outcome = parse(
            "[a]\nHost=10.0.0.1\nUser=u1\n\n[b]\nHostName=box2\nHost=10.0.0.2\nUser=u2\nPort=2222\n",
        );
        assert!(outcome.warnings.is_empty());
        assert_eq!(
            outcome.servers,
            vec![
                record("a", "10.0.0.1", "u1", "22"),
                record("box2", "10.0.0.2", "u2", "2222"),
            ]
        );
    }

    #[test]
    fn test_parse_defaults_port_and_name() {
        let outcome = parse("[db]\nHost = db.local\nUser = admin\n");
        assert_eq!(outcome.servers[0].port, "22");
        assert_eq!(outcome.servers[0].name, "db");
    }

    #[test]
    fn test_missing_required_key_skips_only_that_section() {
        let outcome = parse("[a]\nUser=u1\n[b]\nHost=h\n[c]\nHost=h3\nUser=u3\n");
        assert_eq!(outcome.servers, vec![record("c", "h3", "u3", "22")]);
        assert_eq!(
            outcome.warnings,
            vec![
                ConfigWarning::MissingKey {
                    section: "a".to_string(),
                    key: "Host"
                },
                ConfigWarning::MissingKey {
                    section: "b".to_string(),
                    key: "User"
                },
            ]
        );
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let outcome = parse("[a]\nHost =\nUser = u\n");
        assert!(outcome.servers.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_keys_are_case_insensitive_and_colon_separated() {
        let outcome = parse("[x]\nhostname: Box\nHOST: fe80::1\nuser = me\n");
        assert_eq!(outcome.servers, vec![record("Box", "fe80::1", "me", "22")]);
    }

    #[test]
    fn test_comments_and_blank_lines_are_ignored() {
        let outcome = parse("# top\n; also\n\n[a]\n  # indented\nHost=h\nUser=u\n");
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.servers.len(), 1);
    }

    #[test]
    fn test_default_section_supplies_fallbacks() {
        let outcome = parse("[DEFAULT]\nUser = ops\nPort = 2200\n[a]\nHost = h1\n[b]\nHost = h2\nUser = me\n");
        assert_eq!(
            outcome.servers,
            vec![
                record("a", "h1", "ops", "2200"),
                record("b", "h2", "me", "2200"),
            ]
        );
    }

    #[test]
    fn test_duplicate_section_keeps_first() {
        let outcome = parse("[a]\nHost=h1\nUser=u\n[a]\nHost=h2\nUser=u\n");
        assert_eq!(outcome.servers, vec![record("a", "h1", "u", "22")]);
        assert_eq!(
            outcome.warnings,
            vec![ConfigWarning::DuplicateSection {
                section: "a".to_string(),
                line: 4
            }]
        );
    }

    #[test]
    fn test_malformed_lines_are_reported() {
        let outcome = parse("Host=orphan\n[a]\nHost=h\nUser=u\njunk\n[]\n");
        assert_eq!(outcome.servers.len(), 1);
        let lines: Vec<_> = outcome
            .warnings
            .iter()
            .map(|w| match w {
                ConfigWarning::MalformedLine { line, .. } => *line,
                other => panic!("unexpected warning {other:?}"),
            })
            .collect();
        assert_eq!(lines, vec![1, 5, 6]);
    }

    #[test]
    fn test_invalid_port_skips_section() {
        let outcome = parse("[a]\nHost=h\nUser=u\nPort=ssh\n[b]\nHost=h\nUser=u\nPort=0\n");
        assert!(outcome.servers.is_empty());
        assert_eq!(
            outcome.warnings[0],
            ConfigWarning::InvalidPort {
                section: "a".to_string(),
                value: "ssh".to_string()
            }
        );
    }

    #[test]
    fn test_dash_prefixed_user_or_host_is_rejected() {
        let outcome = parse(
            "[a]\nHost=h\nUser=-oProxyCommand=touch /tmp/x\n[b]\nHost=-lroot\nUser=u\n[c]\nHost=h\nUser=u-1\n",
        );
        assert_eq!(outcome.servers, vec![record("c", "h", "u-1", "22")]);
        assert_eq!(
            outcome.warnings,
            vec![
                ConfigWarning::OptionLikeValue {
                    section: "a".to_string(),
                    key: "User",
                    value: "-oProxyCommand=touch /tmp/x".to_string()
                },
                ConfigWarning::OptionLikeValue {
                    section: "b".to_string(),
                    key: "Host",
                    value: "-lroot".to_string()
                },
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_load_dangling_symlink_is_not_a_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("elsewhere");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::os::unix::fs::symlink(&target, &path).unwrap();

        let outcome = load(&path);
        assert!(!outcome.created_template);
        assert!(outcome.servers.is_empty());
        assert!(matches!(
            outcome.warnings.as_slice(),
            [ConfigWarning::Unreadable { .. }]
        ));
        assert!(!target.exists());
    }

    #[test]
    fn test_load_creates_template_on_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let outcome = load(&path);
        assert!(outcome.created_template);
        assert!(outcome.servers.is_empty());
        assert!(outcome.warnings.is_empty());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written
            .lines()
            .all(|line| line.trim().is_empty() || line.starts_with('#')));

        // the template itself loads cleanly
        let again = load(&path);
        assert!(!again.created_template);
        assert!(again.servers.is_empty());
        assert!(again.warnings.is_empty());
    }

    #[test]
    fn test_load_reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[a]\nHost=10.0.0.1\nUser=u1\n").unwrap();

        let outcome = load(&path);
        assert!(!outcome.created_template);
        assert_eq!(outcome.servers, vec![record("a", "10.0.0.1", "u1", "22")]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "[a]\nHost=10.0.0.1\nUser=u1\n");
    }

    #[test]
    fn test_load_unreadable_path_is_a_warning() {
        // a directory exists but cannot be read as a file
        let dir = tempfile::tempdir().unwrap();
        let outcome = load(dir.path());
        assert!(outcome.servers.is_empty());
        assert!(matches!(
            outcome.warnings.as_slice(),
            [ConfigWarning::Unreadable { .. }]
        ));
    }
}
