//! App Root Component
//!
//! Router with guarded routes and the global providers.

use leptos::*;
use leptos_router::*;

use narrativeiq::Route as Page;

use crate::api;
use crate::components::{Guarded, Nav, Toast};
use crate::pages::{
    Auth, Credits, Dashboard, Documents, History, Index, Mindmap, Profile, Story,
};
use crate::state::provide_global_state;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state(api::build_session());

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                <Nav />

                <main class="flex-1 container mx-auto px-4 py-8">
                    <Routes>
                        <Route path=Page::Index.path() view=Index />
                        <Route
                            path=Page::Auth.path()
                            view=|| view! { <Guarded route=Page::Auth><Auth /></Guarded> }
                        />
                        <Route
                            path=Page::Dashboard.path()
                            view=|| view! { <Guarded route=Page::Dashboard><Dashboard /></Guarded> }
                        />
                        <Route
                            path=Page::Story.path()
                            view=|| view! { <Guarded route=Page::Story><Story /></Guarded> }
                        />
                        <Route
                            path=Page::Mindmap.path()
                            view=|| view! { <Guarded route=Page::Mindmap><Mindmap /></Guarded> }
                        />
                        <Route
                            path=Page::Documents.path()
                            view=|| view! { <Guarded route=Page::Documents><Documents /></Guarded> }
                        />
                        <Route
                            path=Page::History.path()
                            view=|| view! { <Guarded route=Page::History><History /></Guarded> }
                        />
                        <Route
                            path=Page::Profile.path()
                            view=|| view! { <Guarded route=Page::Profile><Profile /></Guarded> }
                        />
                        <Route
                            path=Page::Credits.path()
                            view=|| view! { <Guarded route=Page::Credits><Credits /></Guarded> }
                        />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                <Toast />
            </div>
        </Router>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"🔍"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-400 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href=Page::Index.path()
                class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
            >
                "Go Home"
            </A>
        </div>
    }
}
