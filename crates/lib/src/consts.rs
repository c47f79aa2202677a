/// Length of the truncated SHA-256 used for rule keys.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// Name of the argfile written next to the compiled object.
pub const ARGFILE_NAME: &str = "infer-capture.argsfile";

/// Suffix appended to the output path to locate the compiler's dependency file.
pub const DEP_FILE_SUFFIX: &str = ".dep";

/// Gen-path template for the analyzer results directory. `%s` is the target's short name.
pub const RESULTS_DIR_TEMPLATE: &str = "infer-out-%s";

/// Default location of generated build outputs, relative to the project root.
pub const DEFAULT_GEN_DIR: &str = "buck-out/gen";

/// Default analyzer front-end binary.
pub const DEFAULT_INFER_BIN: &str = "infer";

/// Default compiler driven by the analyzer.
pub const DEFAULT_COMPILER: &str = "clang";
