use leptos::prelude::*;

use crate::components::particle_network::ParticleNetwork;

/// Landing page: the particle network behind a short hero.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<div class="fullscreen-network">
			<ParticleNetwork />
			<div class="page-overlay">
				<h1>"Particle Network"</h1>
				<p class="subtitle">"Hover a node to light up its neighbors."</p>
			</div>
		</div>
	}
}
