//! Scripted multiview session
//!
//! Run with: cargo run --example grid_session
//!
//! Walks through a viewer's session: filling a quad grid, enabling a live-score
//! overlay, swapping cells, shrinking the layout and restoring from a shared
//! link. Feed commands that reach the realtime client are printed as they
//! arrive; set `RUST_LOG=multiview=debug` to see every transition.

use std::sync::Arc;

use multiview::broadcast::{BroadcastDescriptor, BroadcastId, BroadcastKind, BroadcastRegistry};
use multiview::layout::{LayoutCatalog, LayoutId};
use multiview::subscription::{spawn_feed_pump, ChannelBackend, FeedBackend, FeedCommand};
use multiview::{Multiview, MultiviewConfig};

fn registry() -> BroadcastRegistry {
    vec![
        BroadcastDescriptor::new("cmp-archimedes", "2024arc", BroadcastKind::Twitch, "firstinspires_archimedes", "Archimedes"),
        BroadcastDescriptor::new("cmp-curie", "2024cur", BroadcastKind::Twitch, "firstinspires_curie", "Curie"),
        BroadcastDescriptor::new("cmp-daly", "2024dal", BroadcastKind::Twitch, "firstinspires_daly", "Daly"),
        BroadcastDescriptor::new("cmp-daly-alt", "2024dal", BroadcastKind::Youtube, "dQw4w9WgXcQ", "Daly (alt camera)"),
        BroadcastDescriptor::standalone("studio", BroadcastKind::Twitch, "firstupdatesnow", "FIRST Updates Now"),
    ]
    .into_iter()
    .collect()
}

fn print_grid<B: FeedBackend>(label: &str, multiview: &Multiview<B>) {
    println!("-- {} (layout {})", label, multiview.state().layout_id());
    for rendered in multiview.rendered_cells() {
        println!(
            "   slot {} -> cell {} at ({:.0}%, {:.0}%): {}{}",
            rendered.slot,
            rendered.cell,
            rendered.geometry.x,
            rendered.geometry.y,
            rendered.descriptor.display_name,
            if rendered.live_score_on { " [live score]" } else { "" }
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("multiview=info".parse()?)
                .add_directive("grid_session=info".parse()?),
        )
        .init();

    let config = MultiviewConfig::default().default_layout(LayoutId(3));
    let (backend, feed_rx) = ChannelBackend::new(config.feed_channel_capacity);

    let pump = spawn_feed_pump(feed_rx, |command| match command {
        FeedCommand::Subscribe(kind, key) => println!("   + {:?} feed {}", kind, key),
        FeedCommand::Unsubscribe(kind, key) => println!("   - {:?} feed {}", kind, key),
    });

    let mut multiview = Multiview::new(config, Arc::new(LayoutCatalog::default()), registry(), backend)?;

    for id in ["cmp-archimedes", "cmp-curie", "cmp-daly", "cmp-daly-alt"] {
        multiview.add(&BroadcastId::new(id))?;
    }
    print_grid("filled quad", &multiview);

    if let Err(e) = multiview.add(&BroadcastId::new("studio")) {
        println!("   studio not added: {}", e);
    }

    multiview.toggle_live_score(1);
    multiview.swap_cells(1, 3)?;
    print_grid("curie live score, moved to cell 3", &multiview);

    let link = multiview.snapshot();

    multiview.set_layout(LayoutId(1))?;
    print_grid("shrunk to split view", &multiview);

    multiview.restore(&link)?;
    print_grid("restored from link", &multiview);

    multiview.clear();

    // Dropping the multiview drops the last sender and stops the pump
    drop(multiview);
    let ledger = pump.await?;
    println!("feeds still open at exit: {}", !ledger.open().is_empty());

    Ok(())
}
