//! Global constants used throughout the gofn codebase.
//!
//! Module paths, the pinned framework release, reserved directory names and
//! the environment variable names shared with the buildpack lifecycle.

use crate::version::Version;

/// Name of the layer that holds the build-time GOPATH and function env vars.
pub const LAYER_NAME: &str = "functions-framework";

/// Go module of the functions framework.
pub const FRAMEWORK_MODULE: &str = "github.com/GoogleCloudPlatform/functions-framework-go";

/// Package inside [`FRAMEWORK_MODULE`] that the entry point imports.
pub const FRAMEWORK_PACKAGE: &str =
    "github.com/GoogleCloudPlatform/functions-framework-go/funcframework";

/// Framework release required when the function does not pin one.
pub const FRAMEWORK_DEFAULT_VERSION: &str = "v1.1.0";

/// Version requested for go.mod-less vendored builds, where the real version
/// cannot be known.
pub const FRAMEWORK_UNKNOWN_VERSION: &str = "v0.0.0";

/// Threshold at or above which the context-aware entry point is generated.
pub const TEMPLATE_THRESHOLD_VERSION: Version = Version::new(1, 1, 0);

/// Module identity of the generated application.
pub const APP_NAME: &str = "serverless_function_app";

/// Reserved subdirectory the function source is moved into.
pub const FN_SOURCE_DIR: &str = "serverless_function_source_code";

/// Prefix of platform configuration directories left in place during relocation.
pub const RESERVED_CONFIG_PREFIX: &str = ".google";

/// Dependency manifest file name.
pub const MANIFEST_FILE: &str = "go.mod";

/// Placeholder version used for the local replace of the function module.
pub const LOCAL_MODULE_VERSION: &str = "v0.0.0";

/// Entry point file name written by the renderer.
pub const ENTRYPOINT_FILE: &str = "main.go";

/// Location of the package-name helper, relative to the buildpack root.
pub const PACKAGE_HELPER_DIR: &str = "converter/get_package";

/// Environment variable naming the function to invoke.
pub const ENV_FUNCTION_TARGET: &str = "FUNCTION_TARGET";

/// Environment variable naming the function signature type.
pub const ENV_FUNCTION_SIGNATURE_TYPE: &str = "FUNCTION_SIGNATURE_TYPE";

/// Environment variable telling the Go build which package to compile.
pub const ENV_BUILDABLE: &str = "GOOGLE_BUILDABLE";

/// Default command of the `web` process (binary produced by the Go build step).
pub const DEFAULT_WEB_COMMAND: &str = "/layers/google.go.build/bin/main";

/// Exit code the lifecycle interprets as "detect did not pass".
pub const DETECT_FAIL_EXIT_CODE: i32 = 100;
