use yew::prelude::*;

// La sessione va inizializzata una sola volta qui, prima del mount: il token
// salvato viene riletto e passato esplicitamente alle chiamate API, niente
// stato globale ambientale sulle richieste in uscita.
#[function_component(App)]
fn app() -> Html {
    html! {
        <section style="font-family: system-ui, Arial, sans-serif; padding: 2rem;">
            <h1>{"Convivio 👋"}</h1>
            <p>{"Se vedi questo messaggio nel browser, il setup WASM funziona."}</p>
        </section>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
