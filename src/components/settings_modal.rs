use yew::prelude::*;

use crate::model::{Rgb, Theme};

/// The palette the color chips offer.
const PALETTE: [Rgb; 5] = [
    Rgb::new(0xe5, 0x39, 0x35), // red
    Rgb::new(0x1e, 0x88, 0xe5), // blue
    Rgb::new(0x43, 0xa0, 0x47), // green
    Rgb::new(0xfd, 0xd8, 0x35), // yellow
    Rgb::new(0x8e, 0x24, 0xaa), // purple
];

#[derive(Properties, PartialEq, Clone)]
pub struct SettingsModalProps {
    pub show: bool,
    pub theme: Theme,
    pub color: Rgb,
    pub on_theme: Callback<Theme>,
    pub on_color: Callback<Rgb>,
    pub on_close: Callback<()>,
}

#[function_component]
pub fn SettingsModal(props: &SettingsModalProps) -> Html {
    if !props.show {
        return html! {};
    }

    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let theme_button = |label: &str, theme: Theme| {
        let cb = props.on_theme.clone();
        let active = props.theme == theme;
        let style = if active {
            "flex:1; background:#2f81f7; color:#fff;"
        } else {
            "flex:1;"
        };
        html! {
            <button style={style} onclick={Callback::from(move |_| cb.emit(theme))}>
                { label }
            </button>
        }
    };

    let chips = PALETTE.iter().map(|&chip| {
        let cb = props.on_color.clone();
        let border = if chip == props.color {
            "3px solid #fff"
        } else {
            "3px solid transparent"
        };
        let style = format!(
            "width:28px; height:28px; border-radius:50%; background:{chip}; border:{border}; cursor:pointer;"
        );
        html! {
            <button style={style} onclick={Callback::from(move |_| cb.emit(chip))} />
        }
    });

    html! {<div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:50;">
        <div style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; min-width:280px; max-width:420px; display:flex; flex-direction:column; gap:14px;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h3 style="margin:0; font-size:18px;">{"Settings"}</h3>
                <button onclick={close_cb.clone()} style="padding:4px 8px;">{"Close"}</button>
            </div>
            <div style="display:flex; flex-direction:column; gap:6px;">
                <span style="font-size:12px; opacity:0.7;">{"Theme"}</span>
                <div style="display:flex; gap:6px;">
                    { theme_button("Day", Theme::Day) }
                    { theme_button("Night", Theme::Night) }
                </div>
            </div>
            <div style="display:flex; flex-direction:column; gap:6px;">
                <span style="font-size:12px; opacity:0.7;">{"Marker color"}</span>
                <div style="display:flex; gap:8px;">
                    { for chips }
                </div>
            </div>
        </div>
    </div>}
}
