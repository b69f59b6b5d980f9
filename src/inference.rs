//! Text generation via the external inference binary.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::ports::{Invocation, ProcessRunner};

/// Builds `llama-cli -m <model path> -p <prompt> --temp <t> -n <n>`.
///
/// Only the prompt varies between calls. The model path, temperature, and
/// output cap come from `config`.
#[must_use]
pub fn generate_invocation(config: &Config, prompt: &str) -> Invocation {
    Invocation::new(&config.inference_program)
        .arg("-m")
        .arg(config.model_path().to_string_lossy())
        .arg("-p")
        .arg(prompt)
        .arg("--temp")
        .arg(&config.temperature)
        .arg("-n")
        .arg(config.max_new_tokens.to_string())
}

/// Runs the inference binary on `prompt` and returns its trimmed output.
///
/// Blocks for the whole run; there is no timeout.
///
/// # Errors
///
/// Returns [`Error::Spawn`] if the binary cannot be started and
/// [`Error::GenerationFailed`] if it exits non-zero.
pub fn generate(runner: &dyn ProcessRunner, config: &Config, prompt: &str) -> Result<String> {
    let invocation = generate_invocation(config, prompt);
    let output = runner
        .run(&invocation)
        .map_err(|source| Error::Spawn { program: invocation.program.clone(), source })?;

    if !output.success() {
        return Err(Error::GenerationFailed {
            exit_code: output.exit_code,
            output: output.combined(),
        });
    }

    Ok(output.combined().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ProcessOutput;

    struct Fixed(ProcessOutput);

    impl ProcessRunner for Fixed {
        fn run(
            &self,
            _invocation: &Invocation,
        ) -> std::result::Result<ProcessOutput, Box<dyn std::error::Error + Send + Sync>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn invocation_uses_fixed_sampling_arguments() {
        let config = Config::with_token("t");
        let inv = generate_invocation(&config, "Once upon a time");

        assert_eq!(inv.program, "llama-cli");
        assert_eq!(
            inv.args,
            vec![
                "-m",
                "./models/afrideva/Tiny-Vicuna-1B-GGUF/tiny-vicuna-1b.q2_k.gguf",
                "-p",
                "Once upon a time",
                "--temp",
                "0.7",
                "-n",
                "256",
            ]
        );
        assert!(inv.env.is_empty());
    }

    #[test]
    fn output_is_trimmed() {
        let runner = Fixed(ProcessOutput { exit_code: 0, stdout: "  hello \n".into(), stderr: String::new() });
        let text = generate(&runner, &Config::with_token("t"), "hi").unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn non_zero_exit_carries_combined_output() {
        let runner = Fixed(ProcessOutput {
            exit_code: 2,
            stdout: String::new(),
            stderr: "failed to load model\n".into(),
        });
        let err = generate(&runner, &Config::with_token("t"), "hi").unwrap_err();
        assert!(matches!(
            err,
            Error::GenerationFailed { exit_code: 2, ref output } if output == "failed to load model\n"
        ));
    }
}
