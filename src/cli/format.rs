//! Output format dispatch

/// Run the branch matching the output format.
///
/// The JSON branch is an expression returning `Result<()>`; the human branch
/// is a block.
///
/// ```ignore
/// output_by_format_result!(cli.format,
///     json => print_json(&report),
///     human => { println!("moved {}", report.group); }
/// )?;
/// ```
#[macro_export]
macro_rules! output_by_format_result {
    ($format:expr, json => $json:expr, human => $human:block) => {
        match $format {
            $crate::cli::OutputFormat::Json => $json,
            $crate::cli::OutputFormat::Human => {
                $human;
                Ok(())
            }
        }
    };
}
