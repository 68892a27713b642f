//! Credentials that can come from the environment or be written inline

use serde::{Deserialize, Serialize};
use std::fmt;

/// A credential read either from an environment variable or from the config file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConfigurableValue {
	/// "env" reads the variable named in `value`, "plain" uses `value` as is
	#[serde(rename = "type")]
	pub value_type: ValueType,
	pub value: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
	Env,
	Plain,
}

impl ConfigurableValue {
	pub fn from_env(env_var_name: &str) -> Self {
		Self {
			value_type: ValueType::Env,
			value: env_var_name.to_string(),
		}
	}

	pub fn from_plain(plain_value: &str) -> Self {
		Self {
			value_type: ValueType::Plain,
			value: plain_value.to_string(),
		}
	}

	/// Resolve the credential
	///
	/// Empty environment variables are treated as missing so that an exported but
	/// blank token does not produce an empty `Authorization` header.
	pub fn resolve(&self) -> Result<String, ConfigurableValueError> {
		match self.value_type {
			ValueType::Env => match std::env::var(&self.value) {
				Ok(value) if !value.is_empty() => Ok(value),
				_ => Err(ConfigurableValueError::EnvironmentVariableNotFound(
					self.value.clone(),
				)),
			},
			ValueType::Plain if self.value.is_empty() => Err(ConfigurableValueError::EmptyValue),
			ValueType::Plain => Ok(self.value.clone()),
		}
	}

	/// Where the credential comes from, safe to log
	pub fn description(&self) -> String {
		match self.value_type {
			ValueType::Env => format!("environment variable '{}'", self.value),
			ValueType::Plain => "configured plain value".to_string(),
		}
	}
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigurableValueError {
	#[error("Environment variable '{0}' not found")]
	EnvironmentVariableNotFound(String),

	#[error("Configured value is empty")]
	EmptyValue,
}

// Never print plain credentials
impl fmt::Display for ConfigurableValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.value_type {
			ValueType::Env => write!(f, "env:{}", self.value),
			ValueType::Plain => write!(f, "plain:[REDACTED]"),
		}
	}
}

/// `"env:NAME"` reads from the environment, anything else is a plain value
impl From<&str> for ConfigurableValue {
	fn from(value: &str) -> Self {
		if let Some(env_var) = value.strip_prefix("env:") {
			Self::from_env(env_var)
		} else {
			Self::from_plain(value)
		}
	}
}
