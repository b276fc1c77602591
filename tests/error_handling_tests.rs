use cmdtree::{CmdTreeError, CmdTreeResult};
use std::error::Error;

/// Error handling tests
#[cfg(test)]
mod error_handling_tests {
    use super::*;

    #[test]
    fn test_error_types() {
        let errors = vec![
            CmdTreeError::Config { message: "Config error".to_string() },
            CmdTreeError::UnknownCommand("deploy".to_string()),
            CmdTreeError::Output("Output error".to_string()),
            CmdTreeError::Logging("Logging error".to_string()),
        ];

        for error in errors {
            let display = error.to_string();
            assert!(!display.is_empty(), "Error display should not be empty");
            assert!(error.source().is_none());
        }

        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CmdTreeError>();
    }

    #[test]
    fn test_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let cmdtree_error: CmdTreeError = io_error.into();
        assert!(matches!(cmdtree_error, CmdTreeError::Io(_)));
    }

    #[test]
    fn test_flag_error_conversion() {
        let flags = clap::Command::new("build").arg(clap::Arg::new("target").long("target"));
        let clap_error = flags.try_get_matches_from(["build", "--nope"]).unwrap_err();
        let exit_code = clap_error.exit_code();

        let error: CmdTreeError = clap_error.into();
        assert!(matches!(error, CmdTreeError::Flags(_)));
        assert_eq!(error.exit_code(), exit_code);
        assert!(error.to_string().contains("--nope"));
    }

    #[test]
    fn test_result_type() {
        fn success_function() -> CmdTreeResult<String> {
            Ok("success".to_string())
        }
        
        fn error_function() -> CmdTreeResult<String> {
            Err(CmdTreeError::Config { 
                message: "Test error".to_string() 
            })
        }
        
        assert_eq!(success_function().unwrap(), "success");
        assert!(error_function().unwrap_err().to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_chain() {
        let root_cause = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Access denied");
        let error: CmdTreeError = root_cause.into();
        
        let mut current_error: &dyn Error = &error;
        let mut depth = 0;
        
        while let Some(source) = current_error.source() {
            current_error = source;
            depth += 1;
            if depth > 10 {
                break;
            }
        }
        
        assert!(depth > 0, "Should have at least one source error");
    }

    #[test]
    fn test_output_error_becomes_output_variant() {
        let output_error = cmdtree::cli::output::OutputError::IoError(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "pipe closed",
        ));
        let error: CmdTreeError = output_error.into();

        assert!(matches!(error, CmdTreeError::Output(_)));
        assert!(error.to_string().contains("pipe closed"));
    }

    #[test]
    fn test_error_size() {
        use std::mem;
        
        let error_size = mem::size_of::<CmdTreeError>();
        assert!(error_size <= 128, "CmdTreeError too large: {} bytes", error_size);
    }
}
