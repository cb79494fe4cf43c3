pub mod file_dto;

pub use file_dto::{
    BatchFailureDto, BatchFailureKind, BatchFileIdsDto, BatchResultDto, ConfirmUploadDto,
    DownloadUrlDto, FileResponseDto, TrashedFileDto, UploadMetadataDto, UploadRequestDto,
    UploadTicketDto,
};
