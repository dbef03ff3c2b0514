use anyhow::{Result, bail};

use super::open_store;
use crate::cli::{ReviewArgs, ReviewDecision};
use amendtrack::store::ReviewAction;
use amendtrack::util::print_json;

pub fn run(args: ReviewArgs) -> Result<()> {
    let action = match args.action {
        ReviewDecision::Quality => ReviewAction::Quality,
        ReviewDecision::Authority => ReviewAction::Authority,
        ReviewDecision::Reject => match args.reason.filter(|reason| !reason.trim().is_empty()) {
            Some(reason) => ReviewAction::Reject { reason },
            None => bail!("--reason is required when rejecting an amendment"),
        },
    };

    let mut store = open_store(&args.data)?;
    let amendment = store.review_amendment(&args.amendment_id, &action, &args.by)?;
    print_json(&amendment)
}
