//! Per-entity sync target descriptors.
//!
//! A [`SyncTarget`] is the full configuration for syncing one record type:
//! which endpoint to page through, how the pagination and filter parameters
//! are named, where the records sit inside the response body, how each flat
//! column is extracted from the raw JSON, and what the target table looks
//! like. Targets are built once per run and never mutated; everything else in
//! the pipeline is generic over them.

/// Where a flat column's value comes from inside one raw API record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldPath {
    /// Top-level key lookup.
    Key(&'static str),
    /// Lookup through an intermediate object (`record.object.key`). A missing
    /// or null intermediate object resolves to null, never an error.
    Nested(&'static str, &'static str),
    /// Lookup inside the first element of an array field
    /// (`record.list[0].key`). An absent or empty array resolves to null.
    ListHead(&'static str, &'static str),
}

/// MySQL column type for the generated schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlType {
    Int,
    Bool,
    Decimal(u8, u8),
    VarChar(u16),
    Text,
    DateTime,
}

impl SqlType {
    pub fn ddl(&self) -> String {
        match self {
            SqlType::Int => "INT".to_string(),
            SqlType::Bool => "BOOLEAN".to_string(),
            SqlType::Decimal(p, s) => format!("DECIMAL({p},{s})"),
            SqlType::VarChar(n) => format!("VARCHAR({n})"),
            SqlType::Text => "TEXT".to_string(),
            SqlType::DateTime => "DATETIME".to_string(),
        }
    }
}

/// One declared flat column: name, SQL type, and flatten rule.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub ty: SqlType,
    pub source: FieldPath,
}

fn col(name: &'static str, ty: SqlType, source: FieldPath) -> ColumnSpec {
    ColumnSpec { name, ty, source }
}

/// Where the records live inside a JSON object response body.
///
/// Array bodies are always taken as-is; this only disambiguates object
/// bodies, which differ between Acelerato endpoints.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordsWrapper {
    /// Records under `"content"`; an absent or non-array value means no
    /// records (pagination stops).
    Content,
    /// Records under `"data"`; when the key is absent the whole object is
    /// treated as a one-record page.
    DataOrSelf,
}

/// Immutable configuration for syncing one record type.
#[derive(Debug, Clone)]
pub struct SyncTarget {
    /// Human-readable entity label used in logs.
    pub entity: &'static str,
    /// Target MySQL table.
    pub table: &'static str,
    /// API endpoint URL.
    pub endpoint: String,
    /// Query parameter carrying the 1-based page number.
    pub page_param: &'static str,
    /// Query parameter carrying the page size.
    pub size_param: &'static str,
    pub page_size: u32,
    /// Fixed filter parameters sent with every page request.
    pub filters: Vec<(&'static str, String)>,
    pub wrapper: RecordsWrapper,
    /// Primary key column; records where it flattens to null are dropped.
    pub primary_key: &'static str,
    /// Declared columns, in table order.
    pub columns: Vec<ColumnSpec>,
}

/// Helpdesk tickets, landing in the `chamados` table.
pub fn tickets(endpoint: String, min_creation_date: String) -> SyncTarget {
    use FieldPath::{Key, Nested};
    use SqlType::{Bool, DateTime, Int, VarChar};

    SyncTarget {
        entity: "tickets",
        table: "chamados",
        endpoint,
        page_param: "page",
        size_param: "size",
        page_size: 100,
        filters: vec![
            ("status", "TODOS".to_string()),
            ("dataDeCriacaoMinima", min_creation_date),
        ],
        wrapper: RecordsWrapper::DataOrSelf,
        primary_key: "ticketKey",
        columns: vec![
            col("ticketKey", Int, Key("ticketKey")),
            col("titulo", VarChar(255), Key("titulo")),
            col("arquivado", Bool, Key("arquivado")),
            col("lixeira", Bool, Key("lixeira")),
            col("suspenso", Bool, Key("suspenso")),
            col("impedido", Bool, Key("impedido")),
            col("alvoDeSpam", Bool, Key("alvoDeSpam")),
            col("tempoDeVidaEmDias", Int, Key("tempoDeVidaEmDias")),
            col("tempoCiclicoEmDias", Int, Key("tempoCiclicoEmDias")),
            col(
                "kanbanStatusKey",
                Int,
                Nested("kanbanStatus", "kanbanStatusKey"),
            ),
            col(
                "kanbanStatusdescricao",
                VarChar(100),
                Nested("kanbanStatus", "descricao"),
            ),
            col("kanbanStatusinicio", Bool, Nested("kanbanStatus", "inicio")),
            col("kanbanStatusfim", Bool, Nested("kanbanStatus", "fim")),
            col("kanbanStatusfila", Bool, Nested("kanbanStatus", "fila")),
            col(
                "organizacaoKey",
                Int,
                Nested("organizacao", "organizacaoKey"),
            ),
            col("organizacaonome", VarChar(150), Nested("organizacao", "nome")),
            col("organizacaoativo", Bool, Nested("organizacao", "ativo")),
            col(
                "equipeDeAtendimentoequipeKey",
                Int,
                Nested("equipeDeAtendimento", "equipeKey"),
            ),
            col(
                "equipeDeAtendimentonome",
                VarChar(150),
                Nested("equipeDeAtendimento", "nome"),
            ),
            col("agenteUsuarioKey", Int, Nested("agente", "usuarioKey")),
            col("agenteNome", VarChar(150), Nested("agente", "nome")),
            col("agenteEmail", VarChar(255), Nested("agente", "email")),
            col(
                "agenteUltimoAcessoEm",
                DateTime,
                Nested("agente", "ultimoAcessoEm"),
            ),
            col("categoriaKey", Int, Nested("categoria", "categoriaKey")),
            col(
                "categoriadescricao",
                VarChar(150),
                Nested("categoria", "descricao"),
            ),
            col(
                "tipoDeTicketKey",
                Int,
                Nested("tipoDeTicket", "tipoDeTicketKey"),
            ),
            col(
                "tipoDeTicketDescricao",
                VarChar(150),
                Nested("tipoDeTicket", "descricao"),
            ),
            col(
                "tipoDePrioridadeKey",
                Int,
                Nested("tipoDePrioridade", "tipoDePrioridadeKey"),
            ),
            col(
                "tipoDePrioridadeDescricao",
                VarChar(150),
                Nested("tipoDePrioridade", "descricao"),
            ),
            col("dataDeCriacao", DateTime, Key("dataDeCriacao")),
            col("dataDaUltimaAlteracao", DateTime, Key("dataDaUltimaAlteracao")),
            col("reporterUsuarioKey", Int, Nested("reporter", "usuarioKey")),
            col("reporterNome", VarChar(150), Nested("reporter", "nome")),
            col("reporterEmail", VarChar(255), Nested("reporter", "email")),
            col("origem", VarChar(100), Key("origem")),
            col("url", VarChar(300), Key("url")),
        ],
    }
}

/// Time entries, landing in the `apontamentos` table.
///
/// This endpoint names its pagination parameters differently from the other
/// two (`pagina` / `resultadosPorPagina`) and wraps records under `content`.
pub fn time_entries(endpoint: String, start_date: String) -> SyncTarget {
    use FieldPath::{Key, ListHead};
    use SqlType::{Bool, Decimal, Int, Text, VarChar};

    SyncTarget {
        entity: "time entries",
        table: "apontamentos",
        endpoint,
        page_param: "pagina",
        size_param: "resultadosPorPagina",
        page_size: 50,
        filters: vec![("dataInicial", start_date)],
        wrapper: RecordsWrapper::Content,
        primary_key: "requestUUID",
        columns: vec![
            col("requestUUID", VarChar(100), Key("requestUUID")),
            col("apontamentoKey", Int, Key("apontamentoKey")),
            col("ticketKey", Int, Key("ticketKey")),
            col("organizacaoDoTicketKey", Int, Key("organizacaoDoTicketKey")),
            col(
                "organizacaoDoTicketNome",
                VarChar(255),
                Key("organizacaoDoTicketNome"),
            ),
            col("usuarioKey", Int, Key("usuarioKey")),
            col(
                "usuarioNomeAbreviado",
                VarChar(255),
                Key("usuarioNomeAbreviado"),
            ),
            col("descricao", Text, Key("descricao")),
            col("dataDeCriacao", VarChar(50), Key("dataDeCriacao")),
            col("dataDeAlteracao", VarChar(50), Key("dataDeAlteracao")),
            col(
                "dataDoLancamentoFormatada",
                VarChar(50),
                Key("dataDoLancamentoFormatada"),
            ),
            col("dataDoLancamento", VarChar(50), Key("dataDoLancamento")),
            col("horaDoLancamento", VarChar(20), Key("horaDoLancamento")),
            col("quantidade", Decimal(10, 2), Key("quantidade")),
            col(
                "quantidadeFormatada",
                VarChar(20),
                Key("quantidadeFormatada"),
            ),
            col("valorPorQuantidade", Decimal(10, 2), Key("valorPorQuantidade")),
            col("bonificado", Bool, Key("bonificado")),
            col("tipoDeApontamentoKey", Int, Key("tipoDeApontamentoKey")),
            col(
                "permiteEditarApontamentosDeOutrosUsuarios",
                Bool,
                Key("permiteEditarApontamentosDeOutrosUsuarios"),
            ),
            col("valorTotal", Decimal(10, 2), Key("valorTotal")),
            col("valorCredito", Decimal(10, 2), Key("valorCredito")),
            col("ativo", Bool, Key("ativo")),
            col("moderado", Bool, Key("moderado")),
            col(
                "kanbanStatusDescricaoAtuacao",
                VarChar(255),
                Key("kanbanStatusDescricaoAtuacao"),
            ),
            col("excedeuTempoEstimado", Bool, Key("excedeuTempoEstimado")),
            col("semSaldoTempoEstimado", Bool, Key("semSaldoTempoEstimado")),
            col("link_href", Text, ListHead("links", "href")),
        ],
    }
}

/// Satisfaction-survey feedbacks, landing in the `feedbacks` table.
///
/// The API returns a list of answered questions per ticket; the stored row
/// carries only the first answer, matching the original schema.
pub fn feedbacks(endpoint: String, min_creation_date: String) -> SyncTarget {
    use FieldPath::{Key, ListHead};
    use SqlType::{Decimal, Int, Text, VarChar};

    SyncTarget {
        entity: "feedbacks",
        table: "feedbacks",
        endpoint,
        page_param: "page",
        size_param: "size",
        page_size: 100,
        filters: vec![
            ("status", "TODOS".to_string()),
            ("dataDeCriacaoMinima", min_creation_date),
        ],
        wrapper: RecordsWrapper::DataOrSelf,
        primary_key: "ticketId",
        columns: vec![
            col("ticketId", Int, Key("ticketId")),
            col("pesquisaId", Int, Key("pesquisaId")),
            col("pesquisaNome", VarChar(255), Key("pesquisaNome")),
            col("dataDeProntoTicket", VarChar(50), Key("dataDeProntoTicket")),
            col("agenteId", VarChar(50), Key("agenteId")),
            col("agenteNome", VarChar(255), Key("agenteNome")),
            col("comentarios", Text, Key("comentarios")),
            col("avaliacaoMedia", Decimal(5, 2), Key("avaliacaoMedia")),
            col("status", VarChar(50), Key("status")),
            col("pergunta", Text, ListHead("perguntas", "pergunta")),
            col("nota", Decimal(5, 2), ListHead("perguntas", "nota")),
            col(
                "usuarioAvaliacaoId",
                Int,
                ListHead("perguntas", "usuarioAvaliacaoId"),
            ),
            col(
                "usuarioAvaliacaoNome",
                VarChar(255),
                ListHead("perguntas", "usuarioAvaliacaoNome"),
            ),
            col(
                "dataDeAvaliacao",
                VarChar(50),
                ListHead("perguntas", "dataDeAvaliacao"),
            ),
            col("statusPergunta", VarChar(50), ListHead("perguntas", "status")),
        ],
    }
}
