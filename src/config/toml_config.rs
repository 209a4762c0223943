use crate::utils::error::{CalcError, Result};
use crate::utils::validation::{
    validate_file_extensions, validate_non_negative, validate_path, validate_positive_number,
    validate_url, Validate,
};
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub api: Option<ApiConfig>,
    pub calculation: Option<CalculationConfig>,
    pub input: Option<InputConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalculationConfig {
    pub tolerance: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    pub products: Option<String>,
    pub lookup_files: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let config: Self =
            toml::from_str(&processed_content).map_err(|e| CalcError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 替換環境變數 (例如 ${API_KEY})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CalcError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(api) = &self.api {
            validate_url("api.endpoint", &api.endpoint)?;
            if let Some(timeout) = api.timeout_seconds {
                validate_positive_number("api.timeout_seconds", timeout, 1)?;
            }
        }

        if let Some(tolerance) = self.calculation.as_ref().and_then(|c| c.tolerance) {
            validate_non_negative("calculation.tolerance", tolerance)?;
        }

        if let Some(input) = &self.input {
            if let Some(products) = &input.products {
                validate_path("input.products", products)?;
            }
            if let Some(files) = &input.lookup_files {
                validate_file_extensions("input.lookup_files", files, &["csv"])?;
            }
        }

        if let Some(path) = self.output.as_ref().and_then(|o| o.path.as_ref()) {
            validate_path("output.path", path)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[api]
endpoint = "https://allowances.example.com/max-weight"
timeout_seconds = 15

[api.headers]
Authorization = "Bearer abc"

[calculation]
tolerance = 5

[input]
products = "./data/products.csv"
lookup_files = ["./data/allowances.csv"]

[output]
path = "./out/excess.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        let api = config.api.unwrap();
        assert_eq!(api.endpoint, "https://allowances.example.com/max-weight");
        assert_eq!(api.timeout_seconds, Some(15));
        assert_eq!(api.headers.unwrap()["Authorization"], "Bearer abc");
        assert_eq!(
            config.calculation.unwrap().tolerance,
            Some(Decimal::from(5))
        );
        assert_eq!(
            config.input.unwrap().lookup_files,
            Some(vec!["./data/allowances.csv".to_string()])
        );
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.api.is_none());
        assert!(config.calculation.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("WEIGHT_CHECK_TEST_TOKEN", "secret-token");
        let toml_content = r#"
[api]
endpoint = "https://allowances.example.com"

[api.headers]
Authorization = "Bearer ${WEIGHT_CHECK_TEST_TOKEN}"
X-Unset = "${WEIGHT_CHECK_TEST_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let headers = config.api.unwrap().headers.unwrap();

        assert_eq!(headers["Authorization"], "Bearer secret-token");
        assert_eq!(headers["X-Unset"], "${WEIGHT_CHECK_TEST_UNSET_VAR}");
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(TomlConfig::from_toml_str("[api]\nendpoint = \"nowhere\"\n").is_err());
        assert!(TomlConfig::from_toml_str("[calculation]\ntolerance = -1\n").is_err());
        assert!(TomlConfig::from_toml_str("[input]\nlookup_files = [\"a.txt\"]\n").is_err());
        assert!(TomlConfig::from_toml_str("[api\n").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[calculation]\ntolerance = 0").unwrap();

        let config = TomlConfig::from_file(file.path()).unwrap();

        assert_eq!(config.calculation.unwrap().tolerance, Some(Decimal::ZERO));
    }
}
