use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct EraserModalProps {
    pub show: bool,
    pub on_confirm: Callback<()>,
    pub on_close: Callback<()>,
}

#[function_component]
pub fn EraserModal(props: &EraserModalProps) -> Html {
    if !props.show {
        return html! {};
    }

    let confirm_cb = {
        let cb = props.on_confirm.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {<div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:50;">
        <div style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; min-width:280px; display:flex; flex-direction:column; gap:14px;">
            <h3 style="margin:0; font-size:18px;">{"Erase all markers?"}</h3>
            <div style="font-size:13px; opacity:0.8;">{"This removes every marker on the map. It cannot be undone."}</div>
            <div style="display:flex; gap:8px;">
                <button onclick={confirm_cb} style="background:#f85149; border:1px solid #b62324; color:#fff; flex:1;">{"Erase"}</button>
                <button onclick={close_cb} style="flex:0 0 auto;">{"Cancel"}</button>
            </div>
        </div>
    </div>}
}
