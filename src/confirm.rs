// Operator confirmation gate
//
// Before any chain state is trusted the operator must confirm the network the
// endpoint reports. Only the exact token `LGTM` approves; there is no timeout.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};

use log::{info, warn};

use crate::common::{NetworkIdentity, SessionContext};
use crate::error::ValidationError;
use crate::ethereum::ChainReader;
use crate::report::console::{paint, YELLOW};

/// The only input that approves a network
pub const APPROVAL_TOKEN: &str = "LGTM";

/// The question put to the operator
pub const PROMPT: &str = "Does that look right? (LGTM/n)";

/// Asks a human whether the run targets the right network
pub trait NetworkConfirmation {
    fn confirm_network(&self, network: &NetworkIdentity) -> bool;
}

impl<F> NetworkConfirmation for F
where
    F: Fn(&NetworkIdentity) -> bool,
{
    fn confirm_network(&self, network: &NetworkIdentity) -> bool {
        self(network)
    }
}

/// True iff `input` is exactly the approval token
pub fn is_approval(input: &str) -> bool {
    input == APPROVAL_TOKEN
}

/// Prompts on a writer and reads a single line from a reader
pub struct TerminalConfirmation<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl TerminalConfirmation<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalConfirmation<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    pub fn into_output(self) -> W {
        self.output.into_inner()
    }

    fn prompt(&self, network: &NetworkIdentity) -> io::Result<String> {
        let mut out = self.output.borrow_mut();
        write!(
            out,
            "\nValidating the deployment on the chain with:\nName: {}\nChain ID: {}\n",
            network.name, network.chain_id
        )?;
        write!(out, "{}", paint(YELLOW, &format!("{}\n> ", PROMPT)))?;
        out.flush()?;

        let mut line = String::new();
        self.input.borrow_mut().read_line(&mut line)?;
        Ok(strip_line_ending(&line).to_string())
    }
}

impl<R: BufRead, W: Write> NetworkConfirmation for TerminalConfirmation<R, W> {
    fn confirm_network(&self, network: &NetworkIdentity) -> bool {
        match self.prompt(network) {
            Ok(answer) => is_approval(&answer),
            Err(e) => {
                warn!("Could not read operator confirmation: {}", e);
                false
            }
        }
    }
}

fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}

/// Fetch the network identity and have the operator approve it
pub async fn establish_session<C, G>(
    reader: &C,
    gate: &G,
) -> Result<SessionContext, ValidationError>
where
    C: ChainReader + ?Sized,
    G: NetworkConfirmation + ?Sized,
{
    let network = reader
        .network_identity()
        .await
        .map_err(|e| ValidationError::remote("network identity", e))?;

    if !gate.confirm_network(&network) {
        warn!("Operator rejected network {}", network);
        return Err(ValidationError::UnapprovedNetwork {
            network: network.name,
            chain_id: network.chain_id,
        });
    }

    info!("Operator approved network {}", network);
    Ok(SessionContext::new(network, true))
}
