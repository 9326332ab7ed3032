// build.rs - TOML-driven constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    validation: ValidationLimits,
    defaults: Defaults,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct ValidationLimits {
    min_name_length: usize,
    national_id_length: usize,
    min_phone_length: usize,
    min_product_quantity: i64,
    min_products: usize,
    min_invoice_titles: usize,
}

#[derive(serde::Deserialize)]
struct Defaults {
    default_nationality: String,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    max_log_message_length: usize,
    security_min_log_level: u8,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=DORM_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=DORM_CONFIG_DIR");

    let profile = env::var("DORM_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("DORM_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the dorm_wizard directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_constraints(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_constraints(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_NAME_LENGTH: usize = 64;

    if config.validation.national_id_length == 0 {
        panic!("VALIDATION: national_id_length must be greater than zero");
    }

    if config.validation.min_name_length > ABSOLUTE_MAX_NAME_LENGTH {
        panic!("VALIDATION: min_name_length exceeds absolute maximum");
    }

    if config.validation.min_product_quantity < 1 {
        panic!("VALIDATION: min_product_quantity must be at least 1");
    }

    if config.defaults.default_nationality.len() != 2 {
        panic!("DEFAULTS: default_nationality must be a two-letter country code");
    }

    if config.logging.security_min_log_level > 2 {
        panic!("LOGGING: security_min_log_level too high (max: 2)");
    }

    if profile == "production" && config.logging.max_log_message_length > 8192 {
        panic!("PRODUCTION: max_log_message_length too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod validation {{
        pub const MIN_NAME_LENGTH: usize = {};
        pub const NATIONAL_ID_LENGTH: usize = {};
        pub const MIN_PHONE_LENGTH: usize = {};
        pub const MIN_PRODUCT_QUANTITY: i64 = {};
        pub const MIN_PRODUCTS: usize = {};
        pub const MIN_INVOICE_TITLES: usize = {};
    }}

    pub mod defaults {{
        pub const DEFAULT_NATIONALITY: &str = {:?};
    }}

    pub mod logging {{
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const SECURITY_MIN_LOG_LEVEL: u8 = {};
    }}
}}
"#,
        profile,
        config.validation.min_name_length,
        config.validation.national_id_length,
        config.validation.min_phone_length,
        config.validation.min_product_quantity,
        config.validation.min_products,
        config.validation.min_invoice_titles,
        config.defaults.default_nationality,
        config.logging.max_log_message_length,
        config.logging.security_min_log_level,
    );

    fs::write(output_path, constants_code).unwrap();
}
