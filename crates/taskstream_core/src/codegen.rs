//! Source snippets injected into notebook cells by drag-and-drop.
//!
//! The text is executed by a kernel outside our control, so the templates
//! must stay byte-for-byte stable.

/// Code that fetches a job handle for `job_url`.
pub fn job_code(job_url: &str) -> String {
    format!(
        "from tvbextunicore.unicore_wrapper import unicore_wrapper\n\
         unicore = unicore_wrapper.UnicoreWrapper()\n\
         job = unicore.get_job('{job_url}')\n\
         job"
    )
}

/// Code that downloads `file` from the working directory of `job_url`.
pub fn download_file_code(job_url: &str, file: &str) -> String {
    format!(
        "from tvbextunicore.unicore_wrapper import unicore_wrapper\n\
         unicore = unicore_wrapper.UnicoreWrapper()\n\
         download_result = unicore.download_file('{job_url}', '{file}')\n\
         download_result"
    )
}
