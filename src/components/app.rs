use yew::prelude::*;

use super::{eraser_modal::EraserModal, map_view::MapView, settings_modal::SettingsModal};
use crate::model::{Rgb, Snapshot, Theme};
use crate::state::{MarkerStore, ViewTransform};
use crate::storage;
use crate::util::vibrate_soft;

/// The one mutable session everything reads and writes: view transform,
/// markers, theme, marker color. Owned here and shared with the canvas
/// component through an `Rc<RefCell<_>>`, never through module scope.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub view: ViewTransform,
    pub markers: MarkerStore,
    pub theme: Theme,
    pub color: Rgb,
    /// True until the first fit-to-screen init has been applied; set when no
    /// snapshot existed at startup.
    pub first_run: bool,
}

impl Session {
    pub fn restore() -> Self {
        match storage::load() {
            Some(snap) => Self {
                view: ViewTransform {
                    scale: snap.scale,
                    translation: snap.translation,
                    ..Default::default()
                },
                markers: MarkerStore::from_markers(snap.markers),
                theme: snap.theme,
                color: snap.color,
                first_run: false,
            },
            None => Self {
                view: ViewTransform::default(),
                markers: MarkerStore::default(),
                theme: Theme::default(),
                color: Rgb::default(),
                first_run: true,
            },
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            theme: self.theme,
            color: self.color,
            scale: self.view.scale,
            translation: self.view.translation,
            markers: self.markers.markers().to_vec(),
        }
    }

    /// Write-through after every mutating operation; no batching.
    pub fn persist(&self) {
        storage::save(&self.snapshot());
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let session = use_mut_ref(Session::restore);
    let theme = use_state(|| session.borrow().theme);
    let color = use_state(|| session.borrow().color);
    let open_settings = use_state(|| false);
    let open_eraser = use_state(|| false);
    // Bumped when markers change outside the canvas (bulk clear) so MapView
    // redraws.
    let marker_epoch = use_state(|| 0u32);

    let on_theme = {
        let session = session.clone();
        let theme = theme.clone();
        Callback::from(move |t: Theme| {
            let mut s = session.borrow_mut();
            s.theme = t;
            s.persist();
            drop(s);
            theme.set(t);
        })
    };
    let on_color = {
        let session = session.clone();
        let color = color.clone();
        Callback::from(move |c: Rgb| {
            let mut s = session.borrow_mut();
            s.color = c;
            s.persist();
            drop(s);
            color.set(c);
        })
    };
    let on_clear = {
        let session = session.clone();
        let open_eraser = open_eraser.clone();
        let marker_epoch = marker_epoch.clone();
        Callback::from(move |_| {
            let mut s = session.borrow_mut();
            s.markers.clear();
            s.persist();
            drop(s);
            vibrate_soft();
            open_eraser.set(false);
            marker_epoch.set(*marker_epoch + 1);
        })
    };

    let show_settings = {
        let open_settings = open_settings.clone();
        Callback::from(move |_| open_settings.set(true))
    };
    let hide_settings = {
        let open_settings = open_settings.clone();
        Callback::from(move |_| open_settings.set(false))
    };
    let show_eraser = {
        let open_eraser = open_eraser.clone();
        Callback::from(move |_| open_eraser.set(true))
    };
    let hide_eraser = {
        let open_eraser = open_eraser.clone();
        Callback::from(move |_| open_eraser.set(false))
    };

    html! {
        <div id="app" class={(*theme).css_class()} style="position:relative; width:100vw; height:100vh; overflow:hidden;">
            <MapView
                session={session.clone()}
                theme={*theme}
                color={*color}
                marker_epoch={*marker_epoch}
            />
            <div style="position:absolute; top:12px; right:12px; display:flex; gap:6px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px;">
                <button onclick={show_eraser}>{"Eraser"}</button>
                <button onclick={show_settings}>{"Settings"}</button>
            </div>
            <SettingsModal
                show={*open_settings}
                theme={*theme}
                color={*color}
                on_theme={on_theme}
                on_color={on_color}
                on_close={hide_settings}
            />
            <EraserModal
                show={*open_eraser}
                on_confirm={on_clear}
                on_close={hide_eraser}
            />
        </div>
    }
}
