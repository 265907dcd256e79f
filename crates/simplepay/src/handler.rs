use eyre::{Chain, EyreHandler};
use std::{error::Error, fmt};

/// Reports errors as the failed action followed by its causes.
#[derive(Debug, Default)]
pub struct Handler {
    /// Print the raw `Debug` representation instead.
    verbose: bool,
}

impl EyreHandler for Handler {
    fn display(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&causes(error).join(": "))
    }

    fn debug(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.verbose || f.alternate() {
            return fmt::Debug::fmt(error, f);
        }

        let causes = causes(error);
        let Some((error, sources)) = causes.split_first() else { return Ok(()) };
        write!(f, "{error}")?;
        for source in sources {
            write!(f, "\n  caused by: {source}")?;
        }
        Ok(())
    }
}

/// Messages of `error` and its sources. A source whose message is already quoted by the one
/// before it is dropped, e.g. `rpc error: nonce too low` followed by `nonce too low`.
fn causes(error: &(dyn Error + 'static)) -> Vec<String> {
    let mut causes: Vec<_> = Chain::new(error).map(|e| e.to_string().trim().to_string()).collect();
    causes.dedup_by(|next, prev| prev.contains(next.as_str()));
    causes
}

/// Installs [`Handler`] as the global [`eyre`] hook.
///
/// Setting `SIMPLEPAY_DEBUG` switches to verbose reports.
pub fn install() {
    let verbose = std::env::var_os("SIMPLEPAY_DEBUG").is_some();
    if let Err(e) = eyre::set_hook(Box::new(move |_| Box::new(Handler { verbose }))) {
        debug!("failed to install eyre error hook: {e}");
    }
}
