// src/summarizer/prompts.rs
// System prompts for meeting-minutes generation

/// Full meeting-minutes prompt, used when the whole transcript fits in a
/// single chunk and for the final combine pass.
pub const MEETING_MINUTES_PROMPT: &str = "\
You are an expert at writing meeting minutes.
Analyze the transcript you are given and produce minutes in this format:

## Output format

### Summary
Summarize the meeting in 3-5 concise sentences.

### Key Points
- List the important topics that were discussed as bullet points
- Keep each point to one or two sentences

### Action Items
- List concrete tasks or next steps that were decided, as bullet points
- Include owners and deadlines when they were mentioned
- Write \"None\" if there are no action items

## Rules
- Be objective and accurate
- Do not speculate or interpret; only include what the transcript supports";

/// Per-chunk prompt: extract the essentials from one slice of a long
/// transcript so the combine pass can merge them.
pub const CHUNK_PROMPT: &str = "\
You are an expert at condensing meeting transcripts.
Extract the essential content of the text you are given:

### Summary
A short summary of this part of the meeting.

### Key Points
- Main topics and decisions, as bullet points

### Action Items
- Concrete tasks or next steps, as bullet points, if any

Be concise; extract only what matters.";

/// Frame the transcript (or a chunk of it) as the user message.
pub fn chunk_user_prompt(text: &str) -> String {
    format!(
        "Create meeting minutes from the following transcript:\n\n{}",
        text
    )
}

/// Frame the concatenated per-chunk summaries for the combine pass.
pub fn combine_user_prompt(combined: &str) -> String {
    format!(
        "The following are summaries of consecutive parts of one meeting. \
         Merge them into a single coherent set of meeting minutes:\n\n{}",
        combined
    )
}
