use leptos::prelude::*;
use particle_network::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(|| {
		view! { <App /> }
	})
}
