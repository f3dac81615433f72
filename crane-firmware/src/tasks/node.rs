//! Node task
//!
//! Runs the node's role: init once, verification once, then the update
//! loop. The loop never yields; bus receive runs on the interrupt
//! executor.

use defmt::*;

use crate::channels::ChannelInbox;
use crate::roles::CraneNode;

#[embassy_executor::task]
pub async fn node_task(mut node: CraneNode) {
    info!("Node task started at address {}", node.address().get());

    let mut inbox = ChannelInbox;

    node.init();

    if node.verify(&mut inbox) {
        info!("Board verified");
    } else {
        warn!("Board verification failed; restart to retry");
    }

    loop {
        node.update(&mut inbox);
    }
}
