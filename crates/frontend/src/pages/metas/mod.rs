mod state;

use gloo_net::http::Request;
use leptos::prelude::*;
use thaw::*;

use contracts::calc;
use contracts::domain::item::Item;
use contracts::domain::meta::{Meta, MetaDraft};
use contracts::export::ExportFormat;

use crate::shared::api_utils::api_url;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::toast::{push_toast, ToastHost, ToastMessage};
use crate::shared::export::export_metas;
use state::MetasState;

fn confirm(message: &str) -> bool {
    web_sys::window()
        .map(|w| w.confirm_with_message(message).unwrap_or(false))
        .unwrap_or(false)
}

async fn fetch_items() -> Result<Vec<Item>, String> {
    let resp = Request::get(&api_url("/items"))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }
    resp.json::<Vec<Item>>().await.map_err(|e| e.to_string())
}

async fn fetch_metas() -> Result<Vec<Meta>, String> {
    let resp = Request::get(&api_url("/metas"))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }
    resp.json::<Vec<Meta>>().await.map_err(|e| e.to_string())
}

/// POST for a new meta, PUT when an id is being edited.
/// The backend answers with a Portuguese confirmation either way.
async fn send_draft(draft: &MetaDraft, editing_id: Option<i32>) -> Result<String, String> {
    let request = match editing_id {
        Some(id) => Request::put(&api_url(&format!("/metas/{}", id))),
        None => Request::post(&api_url("/metas")),
    };
    let resp = request
        .json(draft)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    let text = resp.text().await.unwrap_or_default();
    if resp.ok() {
        Ok(text)
    } else {
        Err(text)
    }
}

async fn delete_meta(id: i32) -> Result<String, String> {
    let resp = Request::delete(&api_url(&format!("/metas/{}", id)))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    let text = resp.text().await.unwrap_or_default();
    if resp.ok() {
        Ok(text)
    } else {
        Err(text)
    }
}

#[component]
pub fn MetasPage() -> impl IntoView {
    let state = RwSignal::new(MetasState::default());
    let toast = RwSignal::new(Option::<ToastMessage>::None);

    // Inputs bound to the controls; synced into the page state below
    let item_field = RwSignal::new(String::new());
    let date_field = RwSignal::new(String::new());
    let produced_field = RwSignal::new(String::new());
    let overtime_field = RwSignal::new("0".to_string());
    let filter_field = RwSignal::new(String::new());
    let format_field = RwSignal::new("csv".to_string());

    Effect::new(move |_| {
        let v = item_field.get();
        state.update(|s| s.form_item = v);
    });
    Effect::new(move |_| {
        let v = date_field.get();
        state.update(|s| s.form_date = v);
    });
    Effect::new(move |_| {
        let v = produced_field.get();
        state.update(|s| s.form_produced = v);
    });
    Effect::new(move |_| {
        let v = overtime_field.get();
        state.update(|s| s.form_overtime = if v == "1" { 1 } else { 0 });
    });
    Effect::new(move |_| {
        let v = filter_field.get();
        state.update(|s| s.set_filter(v));
    });

    let load = move || {
        state.update(|s| s.is_loading = true);
        leptos::task::spawn_local(async move {
            match fetch_metas().await {
                Ok(metas) => state.update(|s| s.set_metas(metas)),
                Err(e) => push_toast(toast, format!("Erro ao carregar metas: {}", e), true),
            }
            state.update(|s| s.is_loading = false);
        });
    };

    // Initial load: catalog once, then the metas
    Effect::new(move |_| {
        leptos::task::spawn_local(async move {
            match fetch_items().await {
                Ok(items) => state.update(|s| s.set_items(items)),
                Err(e) => push_toast(toast, format!("Erro ao carregar itens: {}", e), true),
            }
        });
        load();
    });

    let clear_form = move || {
        state.update(|s| s.clear_form());
        item_field.set(String::new());
        date_field.set(String::new());
        produced_field.set(String::new());
        overtime_field.set("0".to_string());
    };

    let save = move |_| {
        let st = state.get_untracked();
        let draft = match st.form_draft() {
            Ok(d) => d,
            Err(e) => {
                push_toast(toast, e, true);
                return;
            }
        };
        // Same guard the server applies; fail fast before the round trip
        if let Err(e) = draft.clone().with_derived() {
            push_toast(toast, e, true);
            return;
        }
        let editing_id = st.editing_id;
        if editing_id.is_some() && !confirm("Deseja realmente atualizar esta meta?") {
            return;
        }

        state.update(|s| s.is_loading = true);
        leptos::task::spawn_local(async move {
            match send_draft(&draft, editing_id).await {
                Ok(message) => {
                    push_toast(toast, message, false);
                    clear_form();
                    match fetch_metas().await {
                        Ok(metas) => state.update(|s| s.set_metas(metas)),
                        Err(e) => {
                            push_toast(toast, format!("Erro ao carregar metas: {}", e), true)
                        }
                    }
                }
                Err(message) => push_toast(toast, message, true),
            }
            state.update(|s| s.is_loading = false);
        });
    };

    let edit = move |id: i32| {
        let started = state.try_update(|s| s.begin_edit(id)).unwrap_or(false);
        if !started {
            return;
        }
        let st = state.get_untracked();
        item_field.set(st.form_item.clone());
        date_field.set(st.form_date.clone());
        produced_field.set(st.form_produced.clone());
        overtime_field.set(st.form_overtime.to_string());
    };

    let remove = move |id: i32| {
        if !confirm("Deseja realmente excluir esta meta?") {
            return;
        }
        state.update(|s| s.is_loading = true);
        leptos::task::spawn_local(async move {
            match delete_meta(id).await {
                Ok(message) => {
                    push_toast(toast, message, false);
                    match fetch_metas().await {
                        Ok(metas) => state.update(|s| s.set_metas(metas)),
                        Err(e) => {
                            push_toast(toast, format!("Erro ao carregar metas: {}", e), true)
                        }
                    }
                }
                Err(message) => push_toast(toast, message, true),
            }
            state.update(|s| s.is_loading = false);
        });
    };

    let export = move |_| {
        let Some(format) = ExportFormat::parse(&format_field.get_untracked()) else {
            return;
        };
        let rows = state.with_untracked(|s| s.selected_rows());
        match export_metas(format, &rows) {
            Ok(()) => push_toast(toast, "Exportação concluída!", false),
            Err(e) => push_toast(toast, e, true),
        }
    };

    let go_to_page = move |page: usize| state.update(|s| s.set_page(page));
    let change_page_size = move |size: usize| state.update(|s| s.set_page_size(size));

    view! {
        <div class="page">
            <div class="page__header">
                <h1 class="page__title">"Metas de Produção"</h1>
                <span class="text-muted">
                    {move || if state.get().is_loading { "Carregando…" } else { "" }}
                </span>
            </div>

            <ToastHost toast />

            <div class="form-panel">
                <Flex gap=FlexGap::Small align=FlexAlign::End>
                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Item:"</Label>
                        <Select value=item_field>
                            <option value="">"Selecione o item"</option>
                            <For
                                each=move || state.get().items
                                key=|i| i.code.clone()
                                children=move |i| {
                                    let label = format!("{} - {}", i.code, i.description);
                                    view! { <option value=i.code.clone()>{label}</option> }
                                }
                            />
                        </Select>
                    </Flex>

                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Data:"</Label>
                        <input
                            type="date"
                            class="form-input"
                            prop:value=move || date_field.get()
                            on:input=move |ev| date_field.set(event_target_value(&ev))
                        />
                    </Flex>

                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Quantidade produzida:"</Label>
                        <Input value=produced_field placeholder="0.00" />
                    </Flex>

                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Hora extra:"</Label>
                        <Select value=overtime_field>
                            <option value="0">"Não"</option>
                            <option value="1">"Sim"</option>
                        </Select>
                    </Flex>

                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Qtd. programada:"</Label>
                        <span class="form-computed">
                            {move || calc::format2(state.get().planned_preview())}
                        </span>
                    </Flex>

                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Percentual:"</Label>
                        <span class="form-computed">
                            {move || format!("{}%", calc::format2(state.get().percent_preview()))}
                        </span>
                    </Flex>

                    <Button appearance=ButtonAppearance::Primary on_click=save>
                        {move || {
                            if state.get().editing_id.is_some() { "Atualizar" } else { "Inserir" }
                        }}
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| clear_form()
                    >
                        "Limpar"
                    </Button>
                </Flex>
            </div>

            <div class="filter-panel">
                <Flex gap=FlexGap::Small align=FlexAlign::End>
                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Filtrar:"</Label>
                        <Input value=filter_field placeholder="Item ou descrição…" />
                    </Flex>

                    <PaginationControls
                        current_page=Signal::derive(move || state.get().page)
                        total_pages=Signal::derive(move || state.get().total_pages())
                        total_count=Signal::derive(move || state.get().filtered().len())
                        page_size=Signal::derive(move || state.get().page_size)
                        on_page_change=Callback::new(go_to_page)
                        on_page_size_change=Callback::new(change_page_size)
                    />

                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Exportar:"</Label>
                        <Flex gap=FlexGap::Small>
                            <Select value=format_field>
                                <option value="csv">"CSV"</option>
                                <option value="xlsx">"Excel"</option>
                                <option value="pdf">"PDF"</option>
                            </Select>
                            <Button appearance=ButtonAppearance::Secondary on_click=export>
                                "Exportar"
                            </Button>
                        </Flex>
                    </Flex>
                </Flex>
            </div>

            <div class="page-content">
                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>
                                <input
                                    type="checkbox"
                                    prop:checked=move || state.get().all_filtered_selected()
                                    on:change=move |_| state.update(|s| s.toggle_select_all())
                                />
                            </TableHeaderCell>
                            <TableHeaderCell>"Item"</TableHeaderCell>
                            <TableHeaderCell>"Descrição"</TableHeaderCell>
                            <TableHeaderCell>"Data"</TableHeaderCell>
                            <TableHeaderCell>"Qtd. Programada"</TableHeaderCell>
                            <TableHeaderCell>"Qtd. Produzida"</TableHeaderCell>
                            <TableHeaderCell>"Hora Extra"</TableHeaderCell>
                            <TableHeaderCell>"Percentual"</TableHeaderCell>
                            <TableHeaderCell>"Ações"</TableHeaderCell>
                        </TableRow>
                    </TableHeader>

                    <TableBody>
                        {move || {
                            let st = state.get();
                            let rows = st.page_rows();
                            if rows.is_empty() {
                                return vec![view! {
                                    <TableRow>
                                        <TableCell attr:colspan="9">
                                            <TableCellLayout>
                                                <span class="text-muted">
                                                    {if st.is_loading { "Carregando…" } else { "Nenhuma meta encontrada" }}
                                                </span>
                                            </TableCellLayout>
                                        </TableCell>
                                    </TableRow>
                                }.into_view()];
                            }

                            rows.into_iter()
                                .map(|row| {
                                    let id = row.id;
                                    let description = st.description_for(&row.item_code);
                                    let overtime = if row.overtime == 1 { "Sim" } else { "Não" };
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <input
                                                    type="checkbox"
                                                    prop:checked=move || {
                                                        state.get().selected.contains(&id)
                                                    }
                                                    on:change=move |_| {
                                                        state.update(|s| s.toggle_selected(id))
                                                    }
                                                />
                                            </TableCell>
                                            <TableCell><TableCellLayout>{row.item_code.clone()}</TableCellLayout></TableCell>
                                            <TableCell><TableCellLayout truncate=true>{description}</TableCellLayout></TableCell>
                                            <TableCell><TableCellLayout>{row.date.clone()}</TableCellLayout></TableCell>
                                            <TableCell class="table__cell--right">
                                                <TableCellLayout>{calc::format2(row.planned_quantity)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell class="table__cell--right">
                                                <TableCellLayout>{calc::format2(row.produced_quantity)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell><TableCellLayout>{overtime}</TableCellLayout></TableCell>
                                            <TableCell class="table__cell--right">
                                                <TableCellLayout>
                                                    {format!("{}%", calc::format2(row.completion_percentage))}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <Button
                                                        size=ButtonSize::Small
                                                        appearance=ButtonAppearance::Secondary
                                                        on_click=move |_| edit(id)
                                                    >
                                                        "Editar"
                                                    </Button>
                                                    <Button
                                                        size=ButtonSize::Small
                                                        appearance=ButtonAppearance::Secondary
                                                        on_click=move |_| remove(id)
                                                    >
                                                        "Excluir"
                                                    </Button>
                                                </TableCellLayout>
                                            </TableCell>
                                        </TableRow>
                                    }
                                    .into_view()
                                })
                                .collect::<Vec<_>>()
                        }}
                    </TableBody>
                </Table>
            </div>
        </div>
    }
}
