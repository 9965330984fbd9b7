// src/pipeline/error_macros.rs

#[macro_export]
macro_rules! try_mkdir {
    ($path:expr) => {
        std::fs::create_dir_all($path).map_err(|e| CliError::CreateDirError {
            path: $path.to_path_buf(),
            source: e,
            backtrace: Backtrace::capture(),
        })
    };
}

#[macro_export]
macro_rules! try_write {
    ($path:expr, $result:expr) => {
        $result.map_err(|e| CliError::WriteError {
            path: $path.to_path_buf(),
            source: e,
            backtrace: Backtrace::capture(),
        })
    };
}

#[macro_export]
macro_rules! try_core {
    ($result:expr) => {
        $result.map_err(|e| CliError::Addendum {
            source: e,
            backtrace: Backtrace::capture(),
        })
    };
}
