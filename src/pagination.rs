use crate::{
    cms::ContentClient,
    content::{PostAggregator, PostPage, PostSummary},
    error::Result,
};

/// 游标状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Idle,
    Fetching,
    /// 没有更多页面，终止状态
    Exhausted,
}

/// 一次加载的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// 成功追加了若干篇文章
    Loaded(usize),
    /// 没有更多页面，什么也不做
    NoMorePages,
    /// 已有请求在进行中，本次调用被忽略
    InFlight,
    /// 结果已过期（视图已重置），被丢弃
    Discarded,
}

/// 一次进行中的加载
///
/// 由 [`PaginationCursor::begin`] 发放，交回 [`PaginationCursor::finish`] 或 [`PaginationCursor::abort`]。
#[derive(Debug)]
pub struct FetchTicket {
    token: String,
    generation: u64,
}

impl FetchTicket {
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// "加载更多"分页游标
///
/// 已加载的文章只追加，不按 uid 去重。
#[derive(Debug, Clone)]
pub struct PaginationCursor {
    current_page: u32,
    next_page_token: Option<String>,
    loaded_posts: Vec<PostSummary>,
    state: CursorState,
    generation: u64,
}

impl PaginationCursor {
    pub fn initial(first: PostPage) -> Self {
        let state = if first.next_page.is_some() {
            CursorState::Idle
        } else {
            CursorState::Exhausted
        };

        Self {
            current_page: 1,
            next_page_token: first.next_page,
            loaded_posts: first.posts,
            state,
            generation: 0,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }

    pub fn loaded_posts(&self) -> &[PostSummary] {
        &self.loaded_posts
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// 开始加载下一页
    ///
    /// 没有更多页面返回 [`LoadOutcome::NoMorePages`]，已有请求进行中返回 [`LoadOutcome::InFlight`]。
    pub fn begin(&mut self) -> std::result::Result<FetchTicket, LoadOutcome> {
        match (self.state, &self.next_page_token) {
            (CursorState::Fetching, _) => Err(LoadOutcome::InFlight),
            (CursorState::Exhausted, _) | (_, None) => Err(LoadOutcome::NoMorePages),
            (CursorState::Idle, Some(token)) => {
                let ticket = FetchTicket {
                    token: token.clone(),
                    generation: self.generation,
                };
                self.state = CursorState::Fetching;
                Ok(ticket)
            }
        }
    }

    /// 完成加载，追加结果
    ///
    /// 过期的 ticket 不会修改任何状态。
    pub fn finish(&mut self, ticket: FetchTicket, page: PostPage) -> LoadOutcome {
        if !self.accepts(&ticket) {
            return LoadOutcome::Discarded;
        }

        let loaded = page.posts.len();
        self.loaded_posts.extend(page.posts);
        self.current_page = page.page;
        self.next_page_token = page.next_page;
        self.state = if self.next_page_token.is_some() {
            CursorState::Idle
        } else {
            CursorState::Exhausted
        };

        LoadOutcome::Loaded(loaded)
    }

    /// 加载失败，回到空闲状态
    pub fn abort(&mut self, ticket: FetchTicket) {
        if self.accepts(&ticket) {
            self.state = CursorState::Idle;
        }
    }

    /// 整页刷新，丢弃所有进行中的加载
    pub fn reset(&mut self, first: PostPage) {
        let generation = self.generation + 1;
        *self = Self::initial(first);
        self.generation = generation;
    }

    fn accepts(&self, ticket: &FetchTicket) -> bool {
        self.state == CursorState::Fetching && ticket.generation == self.generation
    }

    /// 加载下一页并追加到列表
    pub async fn load_more<C: ContentClient>(
        &mut self,
        client: &C,
        aggregator: &PostAggregator,
    ) -> Result<LoadOutcome> {
        let ticket = match self.begin() {
            Ok(ticket) => ticket,
            Err(outcome) => return Ok(outcome),
        };

        match aggregator.next_page(client, ticket.token()).await {
            Ok(page) => Ok(self.finish(ticket, page)),
            Err(e) => {
                self.abort(ticket);
                Err(e)
            }
        }
    }
}
