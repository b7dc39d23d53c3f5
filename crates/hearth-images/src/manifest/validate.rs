//! Manifest Validation
//!
//! Promotes a decoded JSON document to a [`Manifest`], one key at a time,
//! stopping at the first missing or wrongly typed key.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::types::{
    Config, ConfigFile, EnvironmentMapping, Installation, Manifest, Meta, Variable,
    REQUIRED_KEYS,
};
use crate::common::error::{ValidationError, ValidationErrorKind};

type Validated<T> = Result<T, ValidationError>;

/// The keys of one JSON object, consumed as they are validated.
struct Fields<'a> {
    file: &'a str,
    /// `None` for the top level of the manifest.
    owner: Option<String>,
    map: Map<String, Value>,
}

impl<'a> Fields<'a> {
    fn has(&self, key: &str) -> bool {
        matches!(self.map.get(key), Some(value) if !value.is_null())
    }

    fn missing(&self, key: &'static str) -> ValidationError {
        match &self.owner {
            Some(owner) => ValidationError::missing_in(self.file, owner.as_str(), key),
            None => ValidationError::missing(self.file, key),
        }
    }

    fn invalid(&self, key: &'static str, reason: impl ToString) -> ValidationError {
        let owner = self.owner.as_deref().unwrap_or("manifest");
        ValidationError::invalid(self.file, owner, key, reason)
    }

    /// Take a required key and decode it; an explicit null counts as missing.
    fn take<T: DeserializeOwned>(&mut self, key: &'static str) -> Validated<T> {
        match self.map.remove(key) {
            None | Some(Value::Null) => Err(self.missing(key)),
            Some(value) => serde_json::from_value(value).map_err(|e| self.invalid(key, e)),
        }
    }

    /// Take a required free-form key; an explicit null is kept as a value.
    fn take_value(&mut self, key: &'static str) -> Validated<Value> {
        self.map.remove(key).ok_or_else(|| self.missing(key))
    }

    fn take_object(&mut self, key: &'static str, owner: impl Into<String>) -> Validated<Self> {
        let map = self.take(key)?;
        Ok(Self {
            file: self.file,
            owner: Some(owner.into()),
            map,
        })
    }

    fn take_objects(&mut self, key: &'static str) -> Validated<Vec<Map<String, Value>>> {
        self.take(key)
    }
}

/// Owner label for an entry of a list, by its name key when it has one.
fn entry_owner(kind: &str, map: &Map<String, Value>, name_key: &str, idx: usize) -> String {
    match map.get(name_key).and_then(Value::as_str) {
        Some(name) => format!("{} {}", kind, name),
        None => format!("{} #{}", kind, idx),
    }
}

/// Validate a manifest document read from `file`.
///
/// Checks run in a fixed order: presence of the top-level keys, uid case,
/// top-level value types, `meta`, `installation`, `config.files`, then
/// `variables`.
pub fn validate(document: Map<String, Value>, file: &str) -> Validated<Manifest> {
    let mut top = Fields {
        file,
        owner: None,
        map: document,
    };

    for key in REQUIRED_KEYS {
        if !top.has(key) {
            return Err(top.missing(key));
        }
    }

    let uid: String = top.take("uid")?;
    if uid != uid.to_lowercase() {
        return Err(ValidationError {
            file: file.to_string(),
            kind: ValidationErrorKind::UppercaseUid { uid },
        });
    }

    let name = top.take("name")?;
    let author = top.take("author")?;
    let docker_image = top.take("docker_image")?;
    let command = top.take("command")?;
    let user = top.take("user")?;
    let stop_command = top.take("stop_command")?;
    let default_image = top.take("default_image")?;

    let mut meta = top.take_object("meta", "meta")?;
    let meta = Meta {
        api_version: meta.take("api_version")?,
    };

    let mut installation = top.take_object("installation", "installation")?;
    let installation = Installation {
        docker_image: installation.take("docker_image")?,
        shell: installation.take("shell")?,
        script: installation.take("script")?,
    };

    let mut config = top.take_object("config", "config")?;
    let files = config
        .take_objects("files")?
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| validate_config_file(entry, idx, file))
        .collect::<Validated<Vec<_>>>()?;

    let variables = top
        .take_objects("variables")?
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| validate_variable(entry, idx, file))
        .collect::<Validated<Vec<_>>>()?;

    Ok(Manifest {
        meta,
        uid,
        name,
        author,
        docker_image,
        command,
        user,
        stop_command,
        default_image,
        variables,
        installation,
        config: Config { files },
    })
}

fn validate_config_file(map: Map<String, Value>, idx: usize, file: &str) -> Validated<ConfigFile> {
    let mut fields = Fields {
        file,
        owner: Some(entry_owner("config file", &map, "filename", idx)),
        map,
    };

    let filename: String = fields.take("filename")?;
    let parser = fields.take("parser")?;
    let environment = fields.take_objects("environment")?;
    let action = fields.take_value("action")?;

    let env_owner = format!("environment of config file {}", filename);
    let environment = environment
        .into_iter()
        .map(|map| validate_mapping(map, file, &env_owner))
        .collect::<Validated<Vec<_>>>()?;

    Ok(ConfigFile {
        filename,
        parser,
        environment,
        action,
    })
}

fn validate_mapping(
    map: Map<String, Value>,
    file: &str,
    owner: &str,
) -> Validated<EnvironmentMapping> {
    let mut fields = Fields {
        file,
        owner: Some(owner.to_string()),
        map,
    };

    Ok(EnvironmentMapping {
        config_variable: fields.take("config_variable")?,
        environment_variable: fields.take("environment_variable")?,
        value_format: fields.take("value_format")?,
    })
}

fn validate_variable(map: Map<String, Value>, idx: usize, file: &str) -> Validated<Variable> {
    let mut fields = Fields {
        file,
        owner: Some(entry_owner("variable", &map, "variable", idx)),
        map,
    };

    Ok(Variable {
        prompt: fields.take("prompt")?,
        variable: fields.take("variable")?,
        install_only: fields.take("install_only")?,
        default: fields.take_value("default")?,
        hidden: fields.take("hidden")?,
    })
}
